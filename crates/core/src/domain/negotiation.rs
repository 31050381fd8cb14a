use serde::{Deserialize, Serialize};

/// Fairness classification of a buyer's offer, ordered from worst to best for the vendor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferTier {
    TooLow,
    Fair,
    Generous,
}

impl OfferTier {
    pub fn advice(self) -> &'static str {
        match self {
            Self::TooLow => "❌ Offer is too low. Consider increasing the price.",
            Self::Fair => "✅ This is a fair and reasonable price.",
            Self::Generous => "👍 Good deal for the vendor.",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::TooLow => "too_low",
            Self::Fair => "fair",
            Self::Generous => "generous",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NegotiationVerdict {
    pub tier: OfferTier,
    pub advice: String,
}

impl From<OfferTier> for NegotiationVerdict {
    fn from(tier: OfferTier) -> Self {
        Self { tier, advice: tier.advice().to_string() }
    }
}
