use std::sync::Arc;

use mandi_core::config::{AppConfig, ConfigError, LoadOptions};
use mandi_core::{CatalogError, MarketAdvisor, TranslationService};
use thiserror::Error;
use tracing::info;

use crate::api::ApiState;
use crate::translate::HttpTranslator;

pub struct Application {
    pub config: AppConfig,
    pub advisor: MarketAdvisor,
    pub translation: TranslationService,
}

impl Application {
    pub fn state(&self) -> ApiState {
        ApiState { advisor: self.advisor.clone(), translation: self.translation.clone() }
    }
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("price catalog could not be built: {0}")]
    Catalog(#[from] CatalogError),
    #[error("translation client could not be built: {0}")]
    TranslationClient(#[source] reqwest::Error),
}

pub fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config)
}

pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let catalog = config.price_catalog()?;
    let policy = config.negotiation_policy()?;
    info!(
        event_name = "system.bootstrap.catalog_loaded",
        correlation_id = "bootstrap",
        crops = catalog.len(),
        fair_floor_ratio = %policy.fair_floor_ratio(),
        "price catalog loaded"
    );

    let translation = if config.translation.enabled {
        let translator = HttpTranslator::from_config(&config.translation)
            .map_err(BootstrapError::TranslationClient)?;
        info!(
            event_name = "system.bootstrap.translation_ready",
            correlation_id = "bootstrap",
            endpoint = translator.endpoint(),
            "translation client configured"
        );
        TranslationService::new(Arc::new(translator))
    } else {
        info!(
            event_name = "system.bootstrap.translation_disabled",
            correlation_id = "bootstrap",
            "translation disabled; requests will return fallback text"
        );
        TranslationService::disabled()
    };

    Ok(Application { advisor: MarketAdvisor::new(catalog, policy), translation, config })
}

#[cfg(test)]
mod tests {
    use mandi_core::config::{AppConfig, ConfigOverrides, LoadOptions};
    use rust_decimal::Decimal;

    use crate::bootstrap::{bootstrap, bootstrap_with_config, BootstrapError};

    #[tokio::test]
    async fn bootstrap_wires_catalog_policy_and_translation() {
        let app = bootstrap(LoadOptions {
            overrides: ConfigOverrides {
                fair_floor_ratio: Some(Decimal::new(9, 1)),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        })
        .expect("bootstrap should succeed with defaults");

        assert_eq!(app.advisor.catalog().len(), 2);
        assert_eq!(app.advisor.policy().fair_floor_ratio(), Decimal::new(9, 1));
        assert_eq!(app.translation.backend(), "http");

        let quote = app.advisor.price("tomato", Decimal::from(5)).expect("tomato is listed");
        assert_eq!(quote.recommended_price, Decimal::from(110));
    }

    #[tokio::test]
    async fn disabled_translation_uses_fallback_backend() {
        let app = bootstrap(LoadOptions {
            overrides: ConfigOverrides {
                translation_enabled: Some(false),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        })
        .expect("bootstrap should succeed");

        assert_eq!(app.translation.backend(), "disabled");
    }

    #[test]
    fn bootstrap_fails_fast_on_invalid_ratio() {
        let result = bootstrap(LoadOptions {
            overrides: ConfigOverrides {
                fair_floor_ratio: Some(Decimal::from(2)),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        });

        let message = match result {
            Ok(_) => panic!("ratio above one should fail"),
            Err(error) => error.to_string(),
        };
        assert!(message.contains("fair_floor_ratio"));
    }

    #[test]
    fn bootstrap_with_config_rejects_empty_catalog() {
        let mut config = AppConfig::default();
        config.catalog.crops.clear();

        let result = bootstrap_with_config(config);
        assert!(matches!(result, Err(BootstrapError::Catalog(_))));
    }
}
