use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::advisory::catalog::{CatalogError, PriceCatalog};
use crate::advisory::negotiation::{default_fair_floor_ratio, NegotiationPolicy};

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub translation: TranslationConfig,
    pub negotiation: NegotiationConfig,
    pub catalog: CatalogConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub graceful_shutdown_secs: u64,
}

#[derive(Clone, Debug)]
pub struct TranslationConfig {
    pub enabled: bool,
    pub base_url: String,
    pub api_key: Option<SecretString>,
    pub source_lang: String,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct NegotiationConfig {
    pub fair_floor_ratio: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct CatalogConfig {
    pub crops: BTreeMap<String, UnitPrices>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitPrices {
    pub min: Decimal,
    pub avg: Decimal,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
    pub translation_enabled: Option<bool>,
    pub translation_base_url: Option<String>,
    pub fair_floor_ratio: Option<Decimal>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("invalid crop catalog: {0}")]
    Catalog(#[from] CatalogError),
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

pub const CONFIG_FILE_CANDIDATES: [&str; 2] = ["mandi.toml", "config/mandi.toml"];

pub fn default_crop_prices() -> BTreeMap<String, UnitPrices> {
    BTreeMap::from([
        ("tomato".to_string(), UnitPrices { min: Decimal::from(18), avg: Decimal::from(22) }),
        ("onion".to_string(), UnitPrices { min: Decimal::from(20), avg: Decimal::from(26) }),
    ])
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                bind_address: "127.0.0.1".to_string(),
                port: 5000,
                graceful_shutdown_secs: 15,
            },
            translation: TranslationConfig {
                enabled: true,
                base_url: "http://localhost:5001".to_string(),
                api_key: None,
                source_lang: "auto".to_string(),
                timeout_secs: 10,
            },
            negotiation: NegotiationConfig { fair_floor_ratio: default_fair_floor_ratio() },
            catalog: CatalogConfig { crops: default_crop_prices() },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected =
                options.config_path.unwrap_or_else(|| PathBuf::from(CONFIG_FILE_CANDIDATES[0]));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    /// Builds the immutable catalog described by `[catalog]`.
    pub fn price_catalog(&self) -> Result<PriceCatalog, CatalogError> {
        PriceCatalog::from_config(&self.catalog)
    }

    pub fn negotiation_policy(&self) -> Result<NegotiationPolicy, ConfigError> {
        NegotiationPolicy::new(self.negotiation.fair_floor_ratio)
            .map_err(|error| {
                ConfigError::Validation(format!("negotiation.fair_floor_ratio rejected: {error}"))
            })
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(server) = patch.server {
            if let Some(bind_address) = server.bind_address {
                self.server.bind_address = bind_address;
            }
            if let Some(port) = server.port {
                self.server.port = port;
            }
            if let Some(graceful_shutdown_secs) = server.graceful_shutdown_secs {
                self.server.graceful_shutdown_secs = graceful_shutdown_secs;
            }
        }

        if let Some(translation) = patch.translation {
            if let Some(enabled) = translation.enabled {
                self.translation.enabled = enabled;
            }
            if let Some(base_url) = translation.base_url {
                self.translation.base_url = base_url;
            }
            if let Some(api_key) = translation.api_key {
                self.translation.api_key = Some(api_key.into());
            }
            if let Some(source_lang) = translation.source_lang {
                self.translation.source_lang = source_lang;
            }
            if let Some(timeout_secs) = translation.timeout_secs {
                self.translation.timeout_secs = timeout_secs;
            }
        }

        if let Some(negotiation) = patch.negotiation {
            if let Some(fair_floor_ratio) = negotiation.fair_floor_ratio {
                self.negotiation.fair_floor_ratio = fair_floor_ratio;
            }
        }

        // A file catalog replaces the built-in table rather than merging with it.
        if let Some(catalog) = patch.catalog {
            self.catalog.crops = catalog.crops;
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("MANDI_SERVER_BIND_ADDRESS") {
            self.server.bind_address = value;
        }
        if let Some(value) = read_env("MANDI_SERVER_PORT") {
            self.server.port = parse_env("MANDI_SERVER_PORT", &value)?;
        }
        if let Some(value) = read_env("MANDI_SERVER_GRACEFUL_SHUTDOWN_SECS") {
            self.server.graceful_shutdown_secs =
                parse_env("MANDI_SERVER_GRACEFUL_SHUTDOWN_SECS", &value)?;
        }

        if let Some(value) = read_env("MANDI_TRANSLATION_ENABLED") {
            self.translation.enabled = parse_env("MANDI_TRANSLATION_ENABLED", &value)?;
        }
        if let Some(value) = read_env("MANDI_TRANSLATION_BASE_URL") {
            self.translation.base_url = value;
        }
        if let Some(value) = read_env("MANDI_TRANSLATION_API_KEY") {
            self.translation.api_key = Some(value.into());
        }
        if let Some(value) = read_env("MANDI_TRANSLATION_SOURCE_LANG") {
            self.translation.source_lang = value;
        }
        if let Some(value) = read_env("MANDI_TRANSLATION_TIMEOUT_SECS") {
            self.translation.timeout_secs = parse_env("MANDI_TRANSLATION_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("MANDI_NEGOTIATION_FAIR_FLOOR_RATIO") {
            self.negotiation.fair_floor_ratio =
                parse_env("MANDI_NEGOTIATION_FAIR_FLOOR_RATIO", &value)?;
        }

        let log_level = read_env("MANDI_LOGGING_LEVEL").or_else(|| read_env("MANDI_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format = read_env("MANDI_LOGGING_FORMAT").or_else(|| read_env("MANDI_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(bind_address) = overrides.bind_address {
            self.server.bind_address = bind_address;
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(enabled) = overrides.translation_enabled {
            self.translation.enabled = enabled;
        }
        if let Some(base_url) = overrides.translation_base_url {
            self.translation.base_url = base_url;
        }
        if let Some(fair_floor_ratio) = overrides.fair_floor_ratio {
            self.negotiation.fair_floor_ratio = fair_floor_ratio;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_server(&self.server)?;
        validate_translation(&self.translation)?;
        self.negotiation_policy()?;
        self.price_catalog()?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    CONFIG_FILE_CANDIDATES.into_iter().map(PathBuf::from).find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
    if server.bind_address.trim().is_empty() {
        return Err(ConfigError::Validation("server.bind_address must not be empty".to_string()));
    }

    if server.port == 0 {
        return Err(ConfigError::Validation("server.port must be greater than zero".to_string()));
    }

    if server.graceful_shutdown_secs == 0 {
        return Err(ConfigError::Validation(
            "server.graceful_shutdown_secs must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

fn validate_translation(translation: &TranslationConfig) -> Result<(), ConfigError> {
    if !translation.enabled {
        return Ok(());
    }

    let base_url = translation.base_url.trim();
    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        return Err(ConfigError::Validation(
            "translation.base_url must start with http:// or https://".to_string(),
        ));
    }

    if translation.source_lang.trim().is_empty() {
        return Err(ConfigError::Validation(
            "translation.source_lang must not be empty (use `auto` for detection)".to_string(),
        ));
    }

    if translation.timeout_secs == 0 || translation.timeout_secs > 120 {
        return Err(ConfigError::Validation(
            "translation.timeout_secs must be in range 1..=120".to_string(),
        ));
    }

    let blank_key =
        translation.api_key.as_ref().is_some_and(|key| key.expose_secret().trim().is_empty());
    if blank_key {
        return Err(ConfigError::Validation(
            "translation.api_key must not be blank when set".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_env<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse::<T>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    server: Option<ServerPatch>,
    translation: Option<TranslationPatch>,
    negotiation: Option<NegotiationPatch>,
    catalog: Option<CatalogConfig>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerPatch {
    bind_address: Option<String>,
    port: Option<u16>,
    graceful_shutdown_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct TranslationPatch {
    enabled: Option<bool>,
    base_url: Option<String>,
    api_key: Option<String>,
    source_lang: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct NegotiationPatch {
    fair_floor_ratio: Option<Decimal>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
