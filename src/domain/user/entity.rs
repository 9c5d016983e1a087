//! User entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{validate_user_id, UserValidationError};

/// User identifier - alphanumeric, hyphens and underscores, max 64 characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Create a new UserId after validation
    pub fn new(id: impl Into<String>) -> Result<Self, UserValidationError> {
        let id = id.into();
        validate_user_id(&id)?;
        Ok(Self(id))
    }

    /// Generate a fresh random (UUID v4) identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The two balance figures carried by a user
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Balance {
    /// Spendable balance
    pub ready_cash: f64,
    /// Total balance, including money not yet spendable
    pub total_money: f64,
}

impl Balance {
    pub fn new(ready_cash: f64, total_money: f64) -> Self {
        Self {
            ready_cash,
            total_money,
        }
    }

    pub fn zero() -> Self {
        Self::default()
    }
}

/// User entity
///
/// `blood_hash` is a pseudonymous account key used for lookups between
/// peers; despite the name it carries no biometric data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    blood_hash: String,
    location_grid: String,
    ready_cash: f64,
    total_money: f64,
    /// Mari function ID string, empty until one is issued
    #[serde(default)]
    function_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user
    pub fn new(
        id: UserId,
        blood_hash: impl Into<String>,
        location_grid: impl Into<String>,
        ready_cash: f64,
        total_money: f64,
    ) -> Self {
        let now = Utc::now();

        Self {
            id,
            blood_hash: blood_hash.into(),
            location_grid: location_grid.into(),
            ready_cash,
            total_money,
            function_id: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Attach a function ID at construction time
    pub fn with_function_id(mut self, function_id: impl Into<String>) -> Self {
        self.function_id = function_id.into();
        self
    }

    // Getters

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn blood_hash(&self) -> &str {
        &self.blood_hash
    }

    pub fn location_grid(&self) -> &str {
        &self.location_grid
    }

    pub fn ready_cash(&self) -> f64 {
        self.ready_cash
    }

    pub fn total_money(&self) -> f64 {
        self.total_money
    }

    pub fn balance(&self) -> Balance {
        Balance::new(self.ready_cash, self.total_money)
    }

    pub fn function_id(&self) -> &str {
        &self.function_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // Mutators

    /// Update the blood hash
    pub fn set_blood_hash(&mut self, blood_hash: impl Into<String>) {
        self.blood_hash = blood_hash.into();
        self.touch();
    }

    /// Update the location grid
    pub fn set_location_grid(&mut self, location_grid: impl Into<String>) {
        self.location_grid = location_grid.into();
        self.touch();
    }

    /// Update the function ID
    pub fn set_function_id(&mut self, function_id: impl Into<String>) {
        self.function_id = function_id.into();
        self.touch();
    }

    /// Update both balances
    pub fn set_balance(&mut self, balance: Balance) {
        self.replace_balance(balance);
        self.touch();
    }

    /// Overwrite the balances without bumping `updated_at`
    pub(crate) fn replace_balance(&mut self, balance: Balance) {
        self.ready_cash = balance.ready_cash;
        self.total_money = balance.total_money;
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
