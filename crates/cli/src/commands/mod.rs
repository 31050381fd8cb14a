pub mod config;
pub mod crops;
pub mod doctor;
pub mod negotiate;
pub mod price;

use mandi_core::config::{AppConfig, LoadOptions};
use mandi_core::MarketAdvisor;
use serde::Serialize;
use serde_json::Value;

pub const EXIT_INPUT_ERROR: u8 = 1;
pub const EXIT_CONFIG_ERROR: u8 = 2;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl CommandResult {
    pub fn success_with_data(
        command: &str,
        message: impl Into<String>,
        data: impl Serialize,
    ) -> Self {
        match serde_json::to_value(data) {
            Ok(data) => Self::ok(command, message.into(), Some(data)),
            Err(error) => Self::failure(command, "serialization", error.to_string(), 1),
        }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
            data: None,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    fn ok(command: &str, message: String, data: Option<Value>) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message,
            data,
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }
}

/// Loads config and builds the advisor, or the `config_validation` failure to print.
fn load_advisor(command: &str) -> Result<MarketAdvisor, CommandResult> {
    let config = AppConfig::load(LoadOptions::default()).map_err(|error| {
        CommandResult::failure(command, "config_validation", error.to_string(), EXIT_CONFIG_ERROR)
    })?;

    let catalog = config.price_catalog().map_err(|error| {
        CommandResult::failure(command, "config_validation", error.to_string(), EXIT_CONFIG_ERROR)
    })?;
    let policy = config.negotiation_policy().map_err(|error| {
        CommandResult::failure(command, "config_validation", error.to_string(), EXIT_CONFIG_ERROR)
    })?;

    Ok(MarketAdvisor::new(catalog, policy))
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        serde_json::json!({
            "command": payload.command,
            "status": "error",
            "error_class": "serialization",
            "message": error.to_string(),
        })
        .to_string()
    })
}
