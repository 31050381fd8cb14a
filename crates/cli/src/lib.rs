pub mod commands;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "mandi",
    about = "Mandi price advisory CLI",
    long_about = "Quote crop prices, check buyer offers, and inspect the advisory configuration.",
    after_help = "Examples:\n  mandi price tomato 5\n  mandi negotiate 100 110\n  \
                  mandi crops\n  mandi doctor --json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Quote min/avg/recommended prices for a crop and quantity")]
    Price {
        #[arg(help = "Crop identifier (case-insensitive)")]
        crop: String,
        #[arg(help = "Quantity in catalog units; must be greater than zero")]
        quantity: Decimal,
    },
    #[command(
        about = "Classify a buyer's offer against a quote's average price",
        allow_negative_numbers = true
    )]
    Negotiate {
        #[arg(help = "Offer for the full quantity")]
        offer: Decimal,
        #[arg(help = "Average price from the quote; must be greater than zero")]
        avg: Decimal,
    },
    #[command(about = "List the crops and unit prices in the active catalog")]
    Crops,
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config, catalog integrity, and translation settings")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Price { crop, quantity } => commands::price::run(&crop, quantity),
        Command::Negotiate { offer, avg } => commands::negotiate::run(offer, avg),
        Command::Crops => commands::crops::run(),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => commands::doctor::run(json),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
