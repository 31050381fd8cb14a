pub mod advisory;
pub mod config;
pub mod domain;
pub mod errors;
pub mod translation;

pub use advisory::{
    catalog::{CatalogError, PriceCatalog},
    negotiation::{evaluate, NegotiationPolicy},
    MarketAdvisor,
};
pub use domain::crop::{CropId, CropPriceEntry};
pub use domain::negotiation::{NegotiationVerdict, OfferTier};
pub use domain::quote::PriceQuote;
pub use errors::{ApplicationError, DomainError, InterfaceError, CROP_NOT_FOUND};
pub use translation::{
    DisabledTranslator, TranslationError, TranslationService, Translator, TRANSLATION_FAILED,
};
