//! CLI module for Mari core
//!
//! Provides subcommands for checking inputs and inspecting user records:
//! - `validate`: run one of the input validators
//! - `function-id`: decode a function ID string
//! - `transfer-coupon`: decode a transfer coupon string
//! - `user`: look up users in a seeded in-memory store

pub mod function_id;
pub mod transfer_coupon;
pub mod user;
pub mod validate;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Mari core - user store and input validation tools
#[derive(Parser)]
#[command(name = "mari-core")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Check a value against one of the validators
    Validate(validate::ValidateArgs),

    /// Decode a function ID string into its fields
    FunctionId(function_id::FunctionIdArgs),

    /// Decode a transfer coupon string into its fields
    TransferCoupon(transfer_coupon::TransferCouponArgs),

    /// Query users from a seed file
    User(user::UserArgs),
}

/// Load `.env` and configuration, then install logging
pub fn bootstrap() -> AppConfig {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    if let Err(e) = logging::init_logging(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
    }
    config
}
