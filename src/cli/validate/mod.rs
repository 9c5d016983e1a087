//! Validate command - runs a single validator against a value

use std::process::ExitCode;

use clap::{Args, ValueEnum};
use tracing::debug;

use crate::domain::validators::{
    validate_amount, validate_bio_hash, validate_blood_hash, validate_location_grid,
    validate_mari_string,
};

/// Which validator to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ValidationKind {
    BloodHash,
    BioHash,
    LocationGrid,
    Amount,
    MariString,
}

/// Arguments for the validate command
#[derive(Args, Clone)]
pub struct ValidateArgs {
    /// Validator to apply
    #[arg(value_enum)]
    pub kind: ValidationKind,

    /// Value to check
    #[arg(allow_hyphen_values = true)]
    pub value: String,
}

/// Apply the selected validator; amounts that do not parse are invalid
pub fn check(kind: ValidationKind, value: &str) -> bool {
    match kind {
        ValidationKind::BloodHash => validate_blood_hash(value),
        ValidationKind::BioHash => validate_bio_hash(value),
        ValidationKind::LocationGrid => validate_location_grid(value),
        ValidationKind::Amount => value.parse::<f64>().is_ok_and(validate_amount),
        ValidationKind::MariString => validate_mari_string(value),
    }
}

/// Run the validate command
pub fn run(args: ValidateArgs) -> ExitCode {
    let valid = check(args.kind, &args.value);
    debug!(kind = ?args.kind, value = %args.value, valid, "Validated value");

    if valid {
        println!("valid");
        ExitCode::SUCCESS
    } else {
        println!("invalid");
        ExitCode::FAILURE
    }
}
