//! Input format validators
//!
//! Pure, stateless checks applied to user-supplied strings and amounts
//! before they reach the repository. None of them normalize their input:
//! no trimming, and case folding only where the rule says so.

use once_cell::sync::Lazy;
use regex::Regex;

/// Upper bound (inclusive) for any single monetary amount
pub const MAX_AMOUNT: f64 = 1_000_000.0;

/// Scheme prefix every Mari string starts with
pub const MARI_SCHEME: &str = "mari://";

/// Four hex digits, either case
static BLOOD_HASH_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9a-fA-F]{4}$").unwrap());

/// Eight uppercase letters, digits or `*` wildcards
static LOCATION_GRID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9A-Z*]{8}$").unwrap());

/// Check that a blood hash is exactly 4 hexadecimal characters
pub fn validate_blood_hash(hash: &str) -> bool {
    BLOOD_HASH_PATTERN.is_match(hash)
}

/// Check that a location grid is 8 characters of `A-Z`, `0-9` or `*`
pub fn validate_location_grid(grid: &str) -> bool {
    LOCATION_GRID_PATTERN.is_match(grid)
}

/// Check that an amount lies within `[0, MAX_AMOUNT]`
///
/// NaN and infinities are rejected.
pub fn validate_amount(amount: f64) -> bool {
    (0.0..=MAX_AMOUNT).contains(&amount)
}

/// Alias of [`validate_blood_hash`]
pub fn validate_bio_hash(hash: &str) -> bool {
    validate_blood_hash(hash)
}

/// Check that a string uses the `mari://` scheme
pub fn validate_mari_string(value: &str) -> bool {
    value.starts_with(MARI_SCHEME)
}
