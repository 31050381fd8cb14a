use mandi_core::CropPriceEntry;

use crate::commands::{load_advisor, CommandResult};

pub fn run() -> CommandResult {
    let advisor = match load_advisor("crops") {
        Ok(advisor) => advisor,
        Err(failure) => return failure,
    };

    let crops: Vec<&CropPriceEntry> = advisor.catalog().entries().collect();
    CommandResult::success_with_data("crops", format!("{} crops priced", crops.len()), crops)
}
