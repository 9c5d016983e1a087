//! User domain
//!
//! This module provides domain types and traits for the user store,
//! including the user entity, field validation, and the repository
//! contract with its change subscription.

mod entity;
mod repository;
mod validation;

pub use entity::{Balance, User, UserId};
pub use repository::{UserRepository, UserStream, UserSubscription};
pub use validation::{
    check_amount, check_blood_hash, check_function_id, check_location_grid, validate_user_id,
    UserValidationError,
};

#[cfg(test)]
pub use repository::MockUserRepository;
