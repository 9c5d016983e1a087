//! Function ID strings
//!
//! A function ID is the Mari string stored alongside a user that encodes
//! their grid, blood hash, balances and seal:
//!
//! ```text
//! mari://v1?g=9X4F*Z5L&b=9a3f&rc=100.00&tm=100.00&seal=abcd1234
//! ```

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Protocol version written by [`FunctionId::new`]
pub const PROTOCOL_VERSION: u32 = 1;

static FUNCTION_ID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^mari://v(\d+)\?g=([^&]+)&b=([^&]+)&rc=([^&]+)&tm=([^&]+)&seal=([^&]+)")
        .unwrap()
});

/// Errors produced while parsing a function ID
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FunctionIdError {
    #[error("Invalid Function ID format")]
    InvalidFormat,

    #[error("Invalid Function ID version: '{0}'")]
    InvalidVersion(String),

    #[error("Invalid Function ID amount for '{field}': '{value}'")]
    InvalidAmount { field: &'static str, value: String },
}

/// Parsed function ID
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionId {
    pub version: u32,
    pub grid: String,
    pub blood_hash: String,
    pub ready_cash: f64,
    pub total_money: f64,
    pub seal: String,
}

impl FunctionId {
    /// Build a function ID at the current protocol version
    pub fn new(
        grid: impl Into<String>,
        blood_hash: impl Into<String>,
        ready_cash: f64,
        total_money: f64,
        seal: impl Into<String>,
    ) -> Self {
        Self {
            version: PROTOCOL_VERSION,
            grid: grid.into(),
            blood_hash: blood_hash.into(),
            ready_cash,
            total_money,
            seal: seal.into(),
        }
    }

    /// Parse a function ID string
    ///
    /// Parameters after `seal` are ignored.
    pub fn parse(value: &str) -> Result<Self, FunctionIdError> {
        let captures = FUNCTION_ID_PATTERN
            .captures(value)
            .ok_or(FunctionIdError::InvalidFormat)?;

        let version = captures[1]
            .parse::<u32>()
            .map_err(|_| FunctionIdError::InvalidVersion(captures[1].to_string()))?;

        Ok(Self {
            version,
            grid: captures[2].to_string(),
            blood_hash: captures[3].to_string(),
            ready_cash: parse_amount("rc", &captures[4])?,
            total_money: parse_amount("tm", &captures[5])?,
            seal: captures[6].to_string(),
        })
    }
}

fn parse_amount(field: &'static str, raw: &str) -> Result<f64, FunctionIdError> {
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| FunctionIdError::InvalidAmount {
            field,
            value: raw.to_string(),
        })
}

impl fmt::Display for FunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "mari://v{}?g={}&b={}&rc={:.2}&tm={:.2}&seal={}",
            self.version, self.grid, self.blood_hash, self.ready_cash, self.total_money, self.seal
        )
    }
}

impl std::str::FromStr for FunctionId {
    type Err = FunctionIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
