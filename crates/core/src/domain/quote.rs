use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::crop::CropId;

/// Quantity-scaled price figures for one crop. Built per request, never stored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub crop_id: CropId,
    #[serde(with = "rust_decimal::serde::float")]
    pub quantity: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub min_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub avg_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub recommended_price: Decimal,
}
