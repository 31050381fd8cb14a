use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Catalog key for a produce type. Always trimmed and lower-cased.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct CropId(String);

impl CropId {
    pub fn normalize(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for CropId {
    fn from(value: String) -> Self {
        Self::normalize(&value)
    }
}

impl From<&str> for CropId {
    fn from(value: &str) -> Self {
        Self::normalize(value)
    }
}

impl From<CropId> for String {
    fn from(value: CropId) -> Self {
        value.0
    }
}

impl fmt::Display for CropId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropPriceEntry {
    pub crop_id: CropId,
    #[serde(with = "rust_decimal::serde::float")]
    pub min_unit_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub avg_unit_price: Decimal,
}

#[cfg(test)]
mod tests {
    use super::CropId;

    #[test]
    fn normalization_trims_and_lowercases() {
        assert_eq!(CropId::normalize("  ToMaTo\t"), CropId::normalize("tomato"));
        assert_eq!(CropId::normalize(" Onion ").as_str(), "onion");
    }

    #[test]
    fn whitespace_only_identifier_is_blank() {
        assert!(CropId::normalize("   ").is_blank());
        assert!(!CropId::normalize("okra").is_blank());
    }

    #[test]
    fn deserialized_identifiers_are_normalized() {
        let id: CropId = serde_json::from_str("\" Chilli \"").expect("crop id should deserialize");
        assert_eq!(id.as_str(), "chilli");
    }
}
