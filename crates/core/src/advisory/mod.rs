pub mod catalog;
pub mod negotiation;

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::domain::{negotiation::NegotiationVerdict, quote::PriceQuote};
use crate::errors::DomainError;

use self::{catalog::PriceCatalog, negotiation::NegotiationPolicy};

/// Entry point shared by the HTTP and CLI surfaces. Validates boundary inputs,
/// then hands them to the catalog or the negotiation policy. The two never call
/// each other; callers feed a quote's average into [`MarketAdvisor::negotiate`].
#[derive(Clone, Debug)]
pub struct MarketAdvisor {
    catalog: Arc<PriceCatalog>,
    policy: NegotiationPolicy,
}

impl MarketAdvisor {
    pub fn new(catalog: PriceCatalog, policy: NegotiationPolicy) -> Self {
        Self { catalog: Arc::new(catalog), policy }
    }

    pub fn catalog(&self) -> &PriceCatalog {
        &self.catalog
    }

    pub fn policy(&self) -> NegotiationPolicy {
        self.policy
    }

    pub fn price(&self, crop: &str, quantity: Decimal) -> Result<PriceQuote, DomainError> {
        self.catalog.quote(crop, require_positive_quantity(quantity)?)
    }

    pub fn negotiate(
        &self,
        offer: Decimal,
        avg_price: Decimal,
    ) -> Result<NegotiationVerdict, DomainError> {
        Ok(self.policy.evaluate(offer, require_positive_reference_price(avg_price)?))
    }
}

pub fn require_positive_quantity(quantity: Decimal) -> Result<Decimal, DomainError> {
    if quantity <= Decimal::ZERO {
        return Err(DomainError::InvalidInput(format!(
            "quantity must be greater than zero, got {quantity}"
        )));
    }
    Ok(quantity)
}

pub fn require_positive_reference_price(avg_price: Decimal) -> Result<Decimal, DomainError> {
    if avg_price <= Decimal::ZERO {
        return Err(DomainError::InvalidInput(format!(
            "avg must be greater than zero, got {avg_price}"
        )));
    }
    Ok(avg_price)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{catalog::PriceCatalog, negotiation::NegotiationPolicy, MarketAdvisor};
    use crate::domain::crop::{CropId, CropPriceEntry};
    use crate::domain::negotiation::OfferTier;
    use crate::errors::DomainError;

    fn advisor() -> MarketAdvisor {
        let catalog = PriceCatalog::new([CropPriceEntry {
            crop_id: CropId::normalize("tomato"),
            min_unit_price: Decimal::from(18),
            avg_unit_price: Decimal::from(22),
        }])
        .expect("fixture catalog is valid");
        MarketAdvisor::new(catalog, NegotiationPolicy::default())
    }

    #[test]
    fn quote_average_feeds_negotiation() {
        let advisor = advisor();
        let quote = advisor.price("Tomato", Decimal::from(5)).expect("tomato is listed");
        let verdict = advisor.negotiate(Decimal::from(100), quote.avg_price).expect("positive avg");

        assert_eq!(verdict.tier, OfferTier::Fair);
    }

    #[test]
    fn non_positive_quantity_is_rejected_before_lookup() {
        let advisor = advisor();
        for quantity in [Decimal::ZERO, Decimal::from(-3)] {
            let error = advisor.price("potato", quantity).expect_err("quantity must be positive");
            assert!(matches!(error, DomainError::InvalidInput(_)));
        }
    }

    #[test]
    fn non_positive_reference_average_is_rejected() {
        let error = advisor()
            .negotiate(Decimal::from(10), Decimal::ZERO)
            .expect_err("avg must be positive");
        assert!(matches!(error, DomainError::InvalidInput(ref message) if message.contains("avg")));
    }
}
