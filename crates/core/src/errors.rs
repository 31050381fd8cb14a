use thiserror::Error;

use crate::domain::crop::CropId;

/// Message surfaced to clients when a crop has no catalog entry.
pub const CROP_NOT_FOUND: &str = "Crop not found";

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("unknown crop `{crop}`")]
    UnknownCrop { crop: CropId },
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Client-facing error. Pricing and negotiation only fail on caller input;
/// translation failures degrade to fallback text instead of surfacing here.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest { message: String, correlation_id: String },
}

impl InterfaceError {
    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest { message, .. } => message,
        }
    }

    pub fn correlation_id(&self) -> &str {
        match self {
            Self::BadRequest { correlation_id, .. } => correlation_id,
        }
    }
}

impl ApplicationError {
    pub fn into_interface(self, correlation_id: impl Into<String>) -> InterfaceError {
        let correlation_id = correlation_id.into();
        match self {
            Self::Domain(DomainError::UnknownCrop { .. }) => {
                InterfaceError::BadRequest { message: CROP_NOT_FOUND.to_owned(), correlation_id }
            }
            Self::Domain(DomainError::InvalidInput(message)) => {
                InterfaceError::BadRequest { message, correlation_id }
            }
        }
    }
}
