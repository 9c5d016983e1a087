//! Transfer coupons
//!
//! A transfer coupon is the Mari string handed from payer to payee:
//!
//! ```text
//! mari://xfer?from=9a3f&to=00ff&val=25.5&g=9X4F*Z5L&exp=1700000000&s=abcd1234
//! ```
//!
//! The scheme and parameter names match case-insensitively, and extra
//! parameters after the seal (sensor readings and the like) are ignored.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

static TRANSFER_COUPON_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^mari://xfer\?from=([^&]+)&to=([^&]+)&val=([^&]+)&g=([^&]+)&exp=([^&]+)&s=([^&]+)")
        .unwrap()
});

/// Errors produced while parsing a transfer coupon
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TransferCouponError {
    #[error("Invalid Transfer Coupon format")]
    InvalidFormat,

    #[error("Invalid Transfer Coupon amount: '{0}'")]
    InvalidAmount(String),

    #[error("Invalid Transfer Coupon expiry: '{0}'")]
    InvalidExpiry(String),
}

/// Parsed transfer coupon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferCoupon {
    /// Payer blood hash
    pub sender_bio: String,
    /// Payee blood hash
    pub receiver_bio: String,
    pub amount: f64,
    pub grid: String,
    /// Expiry as a unix timestamp
    pub expiry: i64,
    pub seal: String,
}

impl TransferCoupon {
    /// Parse a transfer coupon string
    pub fn parse(value: &str) -> Result<Self, TransferCouponError> {
        let captures = TRANSFER_COUPON_PATTERN
            .captures(value)
            .ok_or(TransferCouponError::InvalidFormat)?;

        let amount = captures[3]
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| TransferCouponError::InvalidAmount(captures[3].to_string()))?;

        let expiry = captures[5]
            .parse::<i64>()
            .map_err(|_| TransferCouponError::InvalidExpiry(captures[5].to_string()))?;

        Ok(Self {
            sender_bio: captures[1].to_string(),
            receiver_bio: captures[2].to_string(),
            amount,
            grid: captures[4].to_string(),
            expiry,
            seal: captures[6].to_string(),
        })
    }
}

impl fmt::Display for TransferCoupon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "mari://xfer?from={}&to={}&val={}&g={}&exp={}&s={}",
            self.sender_bio, self.receiver_bio, self.amount, self.grid, self.expiry, self.seal
        )
    }
}

impl std::str::FromStr for TransferCoupon {
    type Err = TransferCouponError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
