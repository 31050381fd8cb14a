use std::time::Duration;

use async_trait::async_trait;
use mandi_core::{config::TranslationConfig, TranslationError, Translator};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Client for a LibreTranslate-compatible `POST /translate` endpoint.
pub struct HttpTranslator {
    client: Client,
    endpoint: String,
    source_lang: String,
    api_key: Option<SecretString>,
}

#[derive(Debug, Serialize)]
struct TranslateApiRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct TranslateApiResponse {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

impl HttpTranslator {
    pub fn from_config(config: &TranslationConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(Duration::from_secs(config.timeout_secs)).build()?;

        Ok(Self {
            client,
            endpoint: format!("{}/translate", config.base_url.trim_end_matches('/')),
            source_lang: config.source_lang.clone(),
            api_key: config.api_key.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Translator for HttpTranslator {
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String, TranslationError> {
        let request = TranslateApiRequest {
            q: text,
            source: &self.source_lang,
            target: target_lang,
            format: "text",
            api_key: self.api_key.as_ref().map(|key| key.expose_secret()),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|error| TranslationError::Transport(error.to_string()))?;

        if !response.status().is_success() {
            return Err(TranslationError::UpstreamStatus { status: response.status().as_u16() });
        }

        let payload: TranslateApiResponse =
            response.json().await.map_err(|error| TranslationError::Decode(error.to_string()))?;
        Ok(payload.translated_text)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
