//! User validation utilities

use thiserror::Error;

use crate::domain::validators::{
    validate_amount, validate_blood_hash, validate_location_grid, validate_mari_string,
    MAX_AMOUNT,
};

/// Errors that can occur during user validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("User ID cannot be empty")]
    EmptyId,

    #[error("User ID exceeds maximum length of {0} characters")]
    IdTooLong(usize),

    #[error("User ID contains invalid character: '{0}'. Only alphanumeric characters, hyphens and underscores are allowed")]
    InvalidIdCharacter(char),

    #[error("Blood hash '{0}' must be exactly 4 hexadecimal characters")]
    InvalidBloodHash(String),

    #[error("Location grid '{0}' must be 8 characters of A-Z, 0-9 or '*'")]
    InvalidLocationGrid(String),

    #[error("{field} must be between 0 and {max}, got {value}")]
    InvalidAmount {
        field: &'static str,
        value: f64,
        max: f64,
    },

    #[error("Function ID must start with 'mari://'")]
    InvalidFunctionId,
}

const MAX_USER_ID_LENGTH: usize = 64;

/// Validate a user ID
///
/// Rules:
/// - Cannot be empty
/// - Maximum 64 characters
/// - Only ASCII alphanumeric characters, hyphens and underscores
pub fn validate_user_id(id: &str) -> Result<(), UserValidationError> {
    if id.is_empty() {
        return Err(UserValidationError::EmptyId);
    }

    if id.len() > MAX_USER_ID_LENGTH {
        return Err(UserValidationError::IdTooLong(MAX_USER_ID_LENGTH));
    }

    if let Some(c) = id
        .chars()
        .find(|c| !c.is_ascii_alphanumeric() && *c != '-' && *c != '_')
    {
        return Err(UserValidationError::InvalidIdCharacter(c));
    }

    Ok(())
}

/// Validate the blood hash of a user record
pub fn check_blood_hash(hash: &str) -> Result<(), UserValidationError> {
    if validate_blood_hash(hash) {
        Ok(())
    } else {
        Err(UserValidationError::InvalidBloodHash(hash.to_string()))
    }
}

/// Validate the location grid of a user record
pub fn check_location_grid(grid: &str) -> Result<(), UserValidationError> {
    if validate_location_grid(grid) {
        Ok(())
    } else {
        Err(UserValidationError::InvalidLocationGrid(grid.to_string()))
    }
}

/// Validate a named balance amount
pub fn check_amount(field: &'static str, value: f64) -> Result<(), UserValidationError> {
    if validate_amount(value) {
        Ok(())
    } else {
        Err(UserValidationError::InvalidAmount {
            field,
            value,
            max: MAX_AMOUNT,
        })
    }
}

/// Validate a function ID; an empty one means "not issued yet"
pub fn check_function_id(function_id: &str) -> Result<(), UserValidationError> {
    if function_id.is_empty() || validate_mari_string(function_id) {
        Ok(())
    } else {
        Err(UserValidationError::InvalidFunctionId)
    }
}
