//! Infrastructure layer - Storage adapters, services and logging

pub mod logging;
pub mod user;
