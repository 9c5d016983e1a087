//! User infrastructure module
//!
//! This module provides the in-memory user repository with per-user change
//! subscriptions, and the user service that validates input before it
//! reaches a repository.

mod repository;
mod service;

pub use repository::InMemoryUserRepository;
pub use service::{
    generate_blood_hash, generate_seal, CreateUserRequest, UserService, DEFAULT_OPENING_BALANCE,
};
