use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use mandi_core::config::{AppConfig, LoadOptions, CONFIG_FILE_CANDIDATES};
use secrecy::ExposeSecret;
use toml::Value;

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, env_key: Option<&str>| {
        field_source(key_path, env_key, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];

    lines.push(render_line(
        "server.bind_address",
        &config.server.bind_address,
        source("server.bind_address", Some("MANDI_SERVER_BIND_ADDRESS")),
    ));
    lines.push(render_line(
        "server.port",
        &config.server.port.to_string(),
        source("server.port", Some("MANDI_SERVER_PORT")),
    ));
    lines.push(render_line(
        "server.graceful_shutdown_secs",
        &config.server.graceful_shutdown_secs.to_string(),
        source("server.graceful_shutdown_secs", Some("MANDI_SERVER_GRACEFUL_SHUTDOWN_SECS")),
    ));

    lines.push(render_line(
        "translation.enabled",
        &config.translation.enabled.to_string(),
        source("translation.enabled", Some("MANDI_TRANSLATION_ENABLED")),
    ));
    lines.push(render_line(
        "translation.base_url",
        &config.translation.base_url,
        source("translation.base_url", Some("MANDI_TRANSLATION_BASE_URL")),
    ));
    let api_key = config
        .translation
        .api_key
        .as_ref()
        .map(|key| redact_key(key.expose_secret()))
        .unwrap_or_else(|| "<unset>".to_string());
    lines.push(render_line(
        "translation.api_key",
        &api_key,
        source("translation.api_key", Some("MANDI_TRANSLATION_API_KEY")),
    ));
    lines.push(render_line(
        "translation.source_lang",
        &config.translation.source_lang,
        source("translation.source_lang", Some("MANDI_TRANSLATION_SOURCE_LANG")),
    ));
    lines.push(render_line(
        "translation.timeout_secs",
        &config.translation.timeout_secs.to_string(),
        source("translation.timeout_secs", Some("MANDI_TRANSLATION_TIMEOUT_SECS")),
    ));

    lines.push(render_line(
        "negotiation.fair_floor_ratio",
        &config.negotiation.fair_floor_ratio.to_string(),
        source("negotiation.fair_floor_ratio", Some("MANDI_NEGOTIATION_FAIR_FLOOR_RATIO")),
    ));

    let crops = config.catalog.crops.keys().cloned().collect::<Vec<_>>().join(", ");
    lines.push(render_line("catalog.crops", &format!("[{crops}]"), source("catalog.crops", None)));

    lines.push(render_line(
        "logging.level",
        &config.logging.level,
        source("logging.level", Some("MANDI_LOGGING_LEVEL")),
    ));
    lines.push(render_line(
        "logging.format",
        &format!("{:?}", config.logging.format),
        source("logging.format", Some("MANDI_LOGGING_FORMAT")),
    ));

    lines.join("\n")
}

fn detect_config_path() -> Option<PathBuf> {
    CONFIG_FILE_CANDIDATES.into_iter().map(PathBuf::from).find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_key: Option<&str>,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_key {
        if env::var_os(env_key).is_some() {
            return format!("env ({env_key})");
        }
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

fn redact_key(key: &str) -> String {
    let trimmed = key.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    match trimmed.get(..4) {
        Some(prefix) if trimmed.len() > 8 => format!("{prefix}***"),
        _ => "<redacted>".to_string(),
    }
}
