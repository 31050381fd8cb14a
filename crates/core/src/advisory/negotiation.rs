use rust_decimal::Decimal;

use crate::domain::negotiation::{NegotiationVerdict, OfferTier};
use crate::errors::DomainError;

/// Share of the average price below which an offer is flagged as too low.
pub fn default_fair_floor_ratio() -> Decimal {
    Decimal::new(8, 1)
}

/// Three-tier offer classification. The fair band is `[ratio * avg, avg]`, inclusive on
/// both edges; everything below is too low and everything above is generous.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NegotiationPolicy {
    fair_floor_ratio: Decimal,
}

impl Default for NegotiationPolicy {
    fn default() -> Self {
        Self { fair_floor_ratio: default_fair_floor_ratio() }
    }
}

impl NegotiationPolicy {
    pub fn new(fair_floor_ratio: Decimal) -> Result<Self, DomainError> {
        if fair_floor_ratio <= Decimal::ZERO || fair_floor_ratio > Decimal::ONE {
            return Err(DomainError::InvalidInput(format!(
                "fair floor ratio must be in (0, 1], got {fair_floor_ratio}"
            )));
        }
        Ok(Self { fair_floor_ratio })
    }

    pub fn fair_floor_ratio(&self) -> Decimal {
        self.fair_floor_ratio
    }

    pub fn fair_floor(&self, avg_price: Decimal) -> Decimal {
        avg_price * self.fair_floor_ratio
    }

    /// Total over every offer; `avg_price` is expected to be positive.
    pub fn classify(&self, offer: Decimal, avg_price: Decimal) -> OfferTier {
        if offer < self.fair_floor(avg_price) {
            OfferTier::TooLow
        } else if offer <= avg_price {
            OfferTier::Fair
        } else {
            OfferTier::Generous
        }
    }

    pub fn evaluate(&self, offer: Decimal, avg_price: Decimal) -> NegotiationVerdict {
        self.classify(offer, avg_price).into()
    }
}

pub fn evaluate(offer: Decimal, avg_price: Decimal) -> NegotiationVerdict {
    NegotiationPolicy::default().evaluate(offer, avg_price)
}
