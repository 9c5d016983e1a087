//! Domain layer - Core entities, contracts and validation

pub mod error;
pub mod function_id;
pub mod transfer_coupon;
pub mod user;
pub mod validators;

pub use error::DomainError;
pub use function_id::{FunctionId, FunctionIdError};
pub use transfer_coupon::{TransferCoupon, TransferCouponError};
pub use user::{Balance, User, UserId, UserRepository, UserSubscription};
pub use validators::{
    validate_amount, validate_bio_hash, validate_blood_hash, validate_location_grid,
    validate_mari_string,
};
