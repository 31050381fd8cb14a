use std::collections::BTreeMap;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::config::CatalogConfig;
use crate::domain::crop::{CropId, CropPriceEntry};
use crate::domain::quote::PriceQuote;
use crate::errors::DomainError;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("catalog must contain at least one crop")]
    Empty,
    #[error("catalog crop identifiers must not be blank")]
    BlankCropId,
    #[error("crop `{crop}` is listed more than once after normalization")]
    DuplicateCrop { crop: CropId },
    #[error("crop `{crop}` must have positive unit prices (min={min}, avg={avg})")]
    NonPositivePrice { crop: CropId, min: Decimal, avg: Decimal },
    #[error("crop `{crop}` has average unit price {avg} below its minimum {min}")]
    AverageBelowMinimum { crop: CropId, min: Decimal, avg: Decimal },
}

/// Immutable crop -> unit price table. Lookup is exact on the normalized identifier.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PriceCatalog {
    entries: BTreeMap<CropId, CropPriceEntry>,
}

impl PriceCatalog {
    pub fn new(entries: impl IntoIterator<Item = CropPriceEntry>) -> Result<Self, CatalogError> {
        let mut table = BTreeMap::new();

        for entry in entries {
            let crop_id = CropId::normalize(entry.crop_id.as_str());
            if crop_id.is_blank() {
                return Err(CatalogError::BlankCropId);
            }

            let (min, avg) = (entry.min_unit_price, entry.avg_unit_price);
            if min <= Decimal::ZERO || avg <= Decimal::ZERO {
                return Err(CatalogError::NonPositivePrice { crop: crop_id, min, avg });
            }
            if avg < min {
                return Err(CatalogError::AverageBelowMinimum { crop: crop_id, min, avg });
            }

            if table.contains_key(&crop_id) {
                return Err(CatalogError::DuplicateCrop { crop: crop_id });
            }
            table.insert(
                crop_id.clone(),
                CropPriceEntry { crop_id, min_unit_price: min, avg_unit_price: avg },
            );
        }

        if table.is_empty() {
            return Err(CatalogError::Empty);
        }

        Ok(Self { entries: table })
    }

    pub fn from_config(config: &CatalogConfig) -> Result<Self, CatalogError> {
        Self::new(config.crops.iter().map(|(crop, prices)| CropPriceEntry {
            crop_id: CropId::normalize(crop),
            min_unit_price: prices.min,
            avg_unit_price: prices.avg,
        }))
    }

    pub fn get(&self, crop: &str) -> Option<&CropPriceEntry> {
        self.entries.get(&CropId::normalize(crop))
    }

    pub fn entries(&self) -> impl Iterator<Item = &CropPriceEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Scales the crop's unit prices by `quantity`. The recommended price is the average.
    ///
    /// Quantity is not clamped here; callers reject non-positive quantities first.
    pub fn quote(&self, crop: &str, quantity: Decimal) -> Result<PriceQuote, DomainError> {
        let crop_id = CropId::normalize(crop);
        let entry =
            self.entries.get(&crop_id).ok_or_else(|| DomainError::UnknownCrop { crop: crop_id })?;

        let scale = |unit_price: Decimal| {
            unit_price.checked_mul(quantity).ok_or_else(|| {
                DomainError::InvalidInput(format!(
                    "quantity {quantity} is too large to price `{}`",
                    entry.crop_id
                ))
            })
        };
        let min_price = scale(entry.min_unit_price)?;
        let avg_price = scale(entry.avg_unit_price)?;

        Ok(PriceQuote {
            crop_id: entry.crop_id.clone(),
            quantity,
            min_price,
            avg_price,
            recommended_price: avg_price,
        })
    }
}
