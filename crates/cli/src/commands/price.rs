use mandi_core::DomainError;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::commands::{load_advisor, CommandResult, EXIT_INPUT_ERROR};

#[derive(Debug, Serialize)]
struct PriceSummary {
    crop: String,
    #[serde(with = "rust_decimal::serde::float")]
    quantity: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    min: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    avg: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    recommended: Decimal,
}

pub fn run(crop: &str, quantity: Decimal) -> CommandResult {
    let advisor = match load_advisor("price") {
        Ok(advisor) => advisor,
        Err(failure) => return failure,
    };

    match advisor.price(crop, quantity) {
        Ok(quote) => CommandResult::success_with_data(
            "price",
            format!(
                "recommended price for {} {} is {}",
                quote.quantity, quote.crop_id, quote.recommended_price
            ),
            PriceSummary {
                crop: quote.crop_id.to_string(),
                quantity: quote.quantity,
                min: quote.min_price,
                avg: quote.avg_price,
                recommended: quote.recommended_price,
            },
        ),
        Err(error @ DomainError::UnknownCrop { .. }) => {
            CommandResult::failure("price", "unknown_crop", error.to_string(), EXIT_INPUT_ERROR)
        }
        Err(error @ DomainError::InvalidInput(_)) => {
            CommandResult::failure("price", "invalid_input", error.to_string(), EXIT_INPUT_ERROR)
        }
    }
}
