use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

/// Text returned to callers whenever the translation collaborator fails.
pub const TRANSLATION_FAILED: &str = "Translation failed";

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TranslationError {
    #[error("translation is disabled by configuration")]
    Disabled,
    #[error("translation request failed: {0}")]
    Transport(String),
    #[error("translation service responded with status {status}")]
    UpstreamStatus { status: u16 },
    #[error("translation response could not be decoded: {0}")]
    Decode(String),
}

#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String, TranslationError>;

    fn name(&self) -> &'static str;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct DisabledTranslator;

#[async_trait]
impl Translator for DisabledTranslator {
    async fn translate(&self, _text: &str, _target_lang: &str) -> Result<String, TranslationError> {
        Err(TranslationError::Disabled)
    }

    fn name(&self) -> &'static str {
        "disabled"
    }
}

/// Wraps a [`Translator`] so that callers always receive a string: empty input
/// short-circuits to empty output, and any failure becomes [`TRANSLATION_FAILED`].
#[derive(Clone)]
pub struct TranslationService {
    translator: Arc<dyn Translator>,
}

impl TranslationService {
    pub fn new(translator: Arc<dyn Translator>) -> Self {
        Self { translator }
    }

    pub fn disabled() -> Self {
        Self::new(Arc::new(DisabledTranslator))
    }

    pub fn backend(&self) -> &'static str {
        self.translator.name()
    }

    pub async fn translate(&self, text: &str, target_lang: &str, correlation_id: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        match self.translator.translate(text, target_lang).await {
            Ok(translated) => {
                debug!(
                    event_name = "translation.completed",
                    correlation_id,
                    backend = self.translator.name(),
                    target_lang,
                    "translation completed"
                );
                translated
            }
            Err(error) => {
                warn!(
                    event_name = "translation.failed",
                    correlation_id,
                    backend = self.translator.name(),
                    target_lang,
                    error = %error,
                    "translation failed, returning fallback text"
                );
                TRANSLATION_FAILED.to_string()
            }
        }
    }
}

impl std::fmt::Debug for TranslationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationService").field("backend", &self.translator.name()).finish()
    }
}
