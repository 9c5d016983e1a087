//! Mari core
//!
//! Building blocks shared by the Mari applications:
//! - The `UserRepository` contract with live per-user subscriptions
//! - An in-memory repository adapter and a validating user service
//! - Stateless validators for blood hashes, location grids, amounts and
//!   Mari strings
//! - Function ID and transfer coupon parsing and formatting

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
pub use domain::{
    validate_amount, validate_bio_hash, validate_blood_hash, validate_location_grid,
    validate_mari_string, Balance, DomainError, FunctionId, TransferCoupon, User, UserId, UserRepository,
    UserSubscription,
};
pub use infrastructure::user::{CreateUserRequest, InMemoryUserRepository, UserService};
