use mandi_core::OfferTier;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::commands::{load_advisor, CommandResult, EXIT_INPUT_ERROR};

#[derive(Debug, Serialize)]
struct NegotiationSummary {
    tier: OfferTier,
    advice: String,
    #[serde(with = "rust_decimal::serde::float")]
    fair_floor: Decimal,
}

pub fn run(offer: Decimal, avg: Decimal) -> CommandResult {
    let advisor = match load_advisor("negotiate") {
        Ok(advisor) => advisor,
        Err(failure) => return failure,
    };

    match advisor.negotiate(offer, avg) {
        Ok(verdict) => CommandResult::success_with_data(
            "negotiate",
            verdict.advice.clone(),
            NegotiationSummary {
                tier: verdict.tier,
                advice: verdict.advice,
                fair_floor: advisor.policy().fair_floor(avg),
            },
        ),
        Err(error) => CommandResult::failure(
            "negotiate",
            "invalid_input",
            error.to_string(),
            EXIT_INPUT_ERROR,
        ),
    }
}
