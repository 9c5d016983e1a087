//! User service for account creation, lookups and balance changes

use std::sync::Arc;

use rand::Rng;
use tracing::{debug, info};

use crate::domain::user::{
    check_amount, check_blood_hash, check_function_id, check_location_grid, Balance, User,
    UserId, UserRepository, UserSubscription, UserValidationError,
};
use crate::domain::{DomainError, FunctionId};

/// Balance a new account starts with when none is requested
pub const DEFAULT_OPENING_BALANCE: f64 = 100.0;

/// Request for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    /// Generated when absent
    pub id: Option<String>,
    /// Generated when absent
    pub blood_hash: Option<String>,
    pub location_grid: String,
    pub ready_cash: f64,
    pub total_money: f64,
    /// Issued from the other fields when empty
    pub function_id: String,
}

impl CreateUserRequest {
    /// Request with generated identifiers and the default opening balance
    pub fn new(location_grid: impl Into<String>) -> Self {
        Self {
            id: None,
            blood_hash: None,
            location_grid: location_grid.into(),
            ready_cash: DEFAULT_OPENING_BALANCE,
            total_money: DEFAULT_OPENING_BALANCE,
            function_id: String::new(),
        }
    }
}

/// Generate a random 4-hex-digit blood hash
pub fn generate_blood_hash() -> String {
    format!("{:04x}", rand::thread_rng().gen_range(0..=0xffffu32))
}

/// Generate a random 8-hex-digit function ID seal
pub fn generate_seal() -> String {
    format!("{:08x}", rand::thread_rng().gen_range(0..=u32::MAX))
}

fn validation_error(error: UserValidationError) -> DomainError {
    DomainError::validation(error.to_string())
}

fn parse_user_id(id: &str) -> Result<UserId, DomainError> {
    UserId::new(id).map_err(|e| DomainError::invalid_id(e.to_string()))
}

fn validate_record(user: &User) -> Result<(), DomainError> {
    check_blood_hash(user.blood_hash()).map_err(validation_error)?;
    check_location_grid(user.location_grid()).map_err(validation_error)?;
    check_amount("ready_cash", user.ready_cash()).map_err(validation_error)?;
    check_amount("total_money", user.total_money()).map_err(validation_error)?;
    check_function_id(user.function_id()).map_err(validation_error)?;
    Ok(())
}

/// User service
///
/// Validates every input with the domain validators before it reaches the
/// repository, which itself accepts whatever it is given.
#[derive(Debug)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    /// Create a new user service
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Create a new user
    pub async fn create(&self, request: CreateUserRequest) -> Result<User, DomainError> {
        let user_id = match request.id {
            Some(id) => parse_user_id(&id)?,
            None => UserId::generate(),
        };
        let blood_hash = request.blood_hash.unwrap_or_else(generate_blood_hash);

        let function_id = if request.function_id.is_empty() {
            FunctionId::new(
                &request.location_grid,
                &blood_hash,
                request.ready_cash,
                request.total_money,
                generate_seal(),
            )
            .to_string()
        } else {
            request.function_id
        };

        let user = User::new(
            user_id,
            blood_hash,
            request.location_grid,
            request.ready_cash,
            request.total_money,
        )
        .with_function_id(function_id);

        validate_record(&user)?;

        self.repository.create_user(user.clone()).await?;

        info!(user_id = %user.id(), blood_hash = %user.blood_hash(), "User created");
        Ok(user)
    }

    /// Get a user by ID
    pub async fn get(&self, id: &str) -> Result<Option<User>, DomainError> {
        let user_id = parse_user_id(id)?;
        self.repository.get_user(&user_id).await
    }

    /// Get a user by blood hash
    pub async fn get_by_blood_hash(&self, blood_hash: &str) -> Result<Option<User>, DomainError> {
        check_blood_hash(blood_hash).map_err(validation_error)?;
        self.repository.get_user_by_blood_hash(blood_hash).await
    }

    /// Current balance of a user; zero for unknown users
    pub async fn balance(&self, id: &str) -> Result<Balance, DomainError> {
        Ok(self
            .get(id)
            .await?
            .map(|user| user.balance())
            .unwrap_or_else(Balance::zero))
    }

    /// Replace a user record after validating it
    pub async fn update(&self, user: &User) -> Result<(), DomainError> {
        validate_record(user)?;
        self.repository.update_user(user).await?;

        debug!(user_id = %user.id(), "User updated");
        Ok(())
    }

    /// Overwrite both balances of a user
    pub async fn update_balance(
        &self,
        id: &str,
        ready_cash: f64,
        total_money: f64,
    ) -> Result<(), DomainError> {
        let user_id = parse_user_id(id)?;
        check_amount("ready_cash", ready_cash).map_err(validation_error)?;
        check_amount("total_money", total_money).map_err(validation_error)?;

        self.repository
            .update_balance(&user_id, ready_cash, total_money)
            .await?;

        info!(user_id = %user_id, ready_cash, total_money, "Balance updated");
        Ok(())
    }

    /// Apply a received payment: `total_money` grows, `ready_cash` is unchanged
    ///
    /// Returns `None` when no user owns the blood hash. The lookup and the
    /// write are separate repository calls, so a concurrent writer between
    /// them is overwritten.
    pub async fn credit(
        &self,
        blood_hash: &str,
        amount: f64,
    ) -> Result<Option<Balance>, DomainError> {
        check_amount("amount", amount).map_err(validation_error)?;

        let Some(user) = self.get_by_blood_hash(blood_hash).await? else {
            debug!(blood_hash = %blood_hash, "Credit for unknown blood hash skipped");
            return Ok(None);
        };

        let balance = Balance::new(user.ready_cash(), user.total_money() + amount);
        check_amount("total_money", balance.total_money).map_err(validation_error)?;

        self.write_balance(&user, balance).await?;

        info!(user_id = %user.id(), amount, "Payment credited");
        Ok(Some(balance))
    }

    /// Apply a sent payment: `ready_cash` shrinks, `total_money` is unchanged
    ///
    /// Returns `None` when no user owns the blood hash. Not atomic: the
    /// sufficiency check runs against the snapshot read before the write.
    pub async fn debit(
        &self,
        blood_hash: &str,
        amount: f64,
    ) -> Result<Option<Balance>, DomainError> {
        check_amount("amount", amount).map_err(validation_error)?;

        let Some(user) = self.get_by_blood_hash(blood_hash).await? else {
            debug!(blood_hash = %blood_hash, "Debit for unknown blood hash skipped");
            return Ok(None);
        };

        if amount > user.ready_cash() {
            return Err(DomainError::validation(format!(
                "Insufficient ready cash: {} available, {} requested",
                user.ready_cash(),
                amount
            )));
        }

        let balance = Balance::new(user.ready_cash() - amount, user.total_money());

        self.write_balance(&user, balance).await?;

        info!(user_id = %user.id(), amount, "Payment debited");
        Ok(Some(balance))
    }

    /// Store a new balance, reissuing the function ID when the user has one
    ///
    /// The reissued ID keeps the seal and grid of the current one. Users
    /// without a parseable function ID only get their balance replaced.
    async fn write_balance(&self, user: &User, balance: Balance) -> Result<(), DomainError> {
        let Ok(function_id) = FunctionId::parse(user.function_id()) else {
            return self
                .repository
                .update_balance(user.id(), balance.ready_cash, balance.total_money)
                .await;
        };

        let reissued = FunctionId {
            ready_cash: balance.ready_cash,
            total_money: balance.total_money,
            ..function_id
        };

        let mut updated = user.clone();
        updated.set_balance(balance);
        updated.set_function_id(reissued.to_string());

        self.repository.update_user(&updated).await
    }

    /// Delete a user
    pub async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let user_id = parse_user_id(id)?;
        self.repository.delete_user(&user_id).await?;

        info!(user_id = %user_id, "User deleted");
        Ok(())
    }

    /// Subscribe to changes of a user
    pub fn observe(&self, id: &str) -> Result<UserSubscription, DomainError> {
        let user_id = parse_user_id(id)?;
        self.repository.observe_user(&user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::MockUserRepository;
    use crate::domain::validators::validate_blood_hash;
    use crate::infrastructure::user::InMemoryUserRepository;
    use futures::StreamExt;

    fn create_service() -> UserService<InMemoryUserRepository> {
        UserService::new(Arc::new(InMemoryUserRepository::new()))
    }

    fn request(id: &str, blood_hash: &str) -> CreateUserRequest {
        CreateUserRequest {
            id: Some(id.to_string()),
            blood_hash: Some(blood_hash.to_string()),
            ..CreateUserRequest::new("9X4F*Z5L")
        }
    }

    #[test]
    fn test_generate_blood_hash() {
        for _ in 0..100 {
            let hash = generate_blood_hash();
            assert_eq!(hash.len(), 4);
            assert!(validate_blood_hash(&hash));
        }
    }

    #[tokio::test]
    async fn test_create_user() {
        let service = create_service();

        let user = service.create(request("user-1", "9a3f")).await.unwrap();

        assert_eq!(user.id().as_str(), "user-1");
        assert_eq!(user.balance(), Balance::new(100.0, 100.0));

        let retrieved = service.get("user-1").await.unwrap();
        assert_eq!(retrieved, Some(user));
    }

    #[test]
    fn test_generate_seal() {
        let seal = generate_seal();
        assert_eq!(seal.len(), 8);
        assert!(seal.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn test_create_issues_function_id() {
        let service = create_service();

        let user = service.create(request("user-1", "9a3f")).await.unwrap();

        let function_id = FunctionId::parse(user.function_id()).unwrap();
        assert_eq!(function_id.grid, "9X4F*Z5L");
        assert_eq!(function_id.blood_hash, "9a3f");
        assert_eq!(function_id.ready_cash, 100.0);
        assert_eq!(function_id.total_money, 100.0);
        assert_eq!(function_id.seal.len(), 8);
    }

    #[tokio::test]
    async fn test_create_keeps_given_function_id() {
        let service = create_service();
        let given = "mari://v1?g=9X4F*Z5L&b=9a3f&rc=5.00&tm=5.00&seal=fixed";

        let user = service
            .create(CreateUserRequest {
                function_id: given.to_string(),
                ..request("user-1", "9a3f")
            })
            .await
            .unwrap();

        assert_eq!(user.function_id(), given);
    }

    #[tokio::test]
    async fn test_payments_reissue_function_id() {
        let service = create_service();
        let created = service.create(request("user-1", "9a3f")).await.unwrap();
        let seal = FunctionId::parse(created.function_id()).unwrap().seal;

        service.credit("9a3f", 25.0).await.unwrap();
        service.debit("9a3f", 40.0).await.unwrap();

        let stored = service.get("user-1").await.unwrap().unwrap();
        let function_id = FunctionId::parse(stored.function_id()).unwrap();
        assert_eq!(function_id.ready_cash, 60.0);
        assert_eq!(function_id.total_money, 125.0);
        assert_eq!(function_id.seal, seal);
        assert_eq!(function_id.grid, stored.location_grid());
        assert_eq!(stored.balance(), Balance::new(60.0, 125.0));
    }

    #[tokio::test]
    async fn test_create_generates_identifiers() {
        let service = create_service();

        let user = service
            .create(CreateUserRequest::new("A1B2C3D4"))
            .await
            .unwrap();

        assert!(validate_blood_hash(user.blood_hash()));
        assert!(service.get(user.id().as_str()).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_fields() {
        let service = create_service();

        let bad_hash = service.create(request("user-1", "12g4")).await;
        assert!(matches!(bad_hash, Err(DomainError::Validation { .. })));

        let bad_grid = service
            .create(CreateUserRequest {
                location_grid: "a1*2***9".to_string(),
                ..request("user-1", "9a3f")
            })
            .await;
        assert!(matches!(bad_grid, Err(DomainError::Validation { .. })));

        let bad_amount = service
            .create(CreateUserRequest {
                ready_cash: -0.01,
                ..request("user-1", "9a3f")
            })
            .await;
        assert!(matches!(bad_amount, Err(DomainError::Validation { .. })));

        let bad_function_id = service
            .create(CreateUserRequest {
                function_id: "http://nope".to_string(),
                ..request("user-1", "9a3f")
            })
            .await;
        assert!(matches!(bad_function_id, Err(DomainError::Validation { .. })));

        let bad_id = service.create(request("user 1", "9a3f")).await;
        assert!(matches!(bad_id, Err(DomainError::InvalidId { .. })));

        assert!(service.get("user-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_duplicate() {
        let service = create_service();
        service.create(request("user-1", "9a3f")).await.unwrap();

        let result = service.create(request("user-1", "00ff")).await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_get_by_blood_hash() {
        let service = create_service();
        service.create(request("user-1", "9a3f")).await.unwrap();

        let user = service.get_by_blood_hash("9a3f").await.unwrap();
        assert_eq!(user.unwrap().id().as_str(), "user-1");

        let invalid = service.get_by_blood_hash("xyz").await;
        assert!(matches!(invalid, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_balance_defaults_to_zero() {
        let service = create_service();

        assert_eq!(service.balance("nobody").await.unwrap(), Balance::zero());

        service.create(request("user-1", "9a3f")).await.unwrap();
        assert_eq!(
            service.balance("user-1").await.unwrap(),
            Balance::new(100.0, 100.0)
        );
    }

    #[tokio::test]
    async fn test_update_balance() {
        let service = create_service();
        service.create(request("user-1", "9a3f")).await.unwrap();

        service.update_balance("user-1", 10.0, 20.0).await.unwrap();
        assert_eq!(
            service.balance("user-1").await.unwrap(),
            Balance::new(10.0, 20.0)
        );

        let negative = service.update_balance("user-1", -1.0, 20.0).await;
        assert!(matches!(negative, Err(DomainError::Validation { .. })));

        let too_large = service.update_balance("user-1", 1.0, 1_000_000.01).await;
        assert!(matches!(too_large, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_update_validates_record() {
        let service = create_service();
        let mut user = service.create(request("user-1", "9a3f")).await.unwrap();

        user.set_location_grid("bad");
        let result = service.update(&user).await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));

        user.set_location_grid("A1B2C3D4");
        service.update(&user).await.unwrap();

        let stored = service.get("user-1").await.unwrap().unwrap();
        assert_eq!(stored.location_grid(), "A1B2C3D4");
    }

    #[tokio::test]
    async fn test_credit() {
        let service = create_service();
        service.create(request("user-1", "9a3f")).await.unwrap();

        let balance = service.credit("9a3f", 25.0).await.unwrap();
        assert_eq!(balance, Some(Balance::new(100.0, 125.0)));
        assert_eq!(
            service.balance("user-1").await.unwrap(),
            Balance::new(100.0, 125.0)
        );

        assert_eq!(service.credit("0000", 25.0).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_credit_over_limit() {
        let service = create_service();
        service.create(request("user-1", "9a3f")).await.unwrap();

        let result = service.credit("9a3f", 999_950.0).await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_debit() {
        let service = create_service();
        service.create(request("user-1", "9a3f")).await.unwrap();

        let balance = service.debit("9a3f", 40.0).await.unwrap();
        assert_eq!(balance, Some(Balance::new(60.0, 100.0)));

        let overdraft = service.debit("9a3f", 60.01).await;
        assert!(matches!(overdraft, Err(DomainError::Validation { .. })));

        assert_eq!(
            service.balance("user-1").await.unwrap(),
            Balance::new(60.0, 100.0)
        );
    }

    #[tokio::test]
    async fn test_delete() {
        let service = create_service();
        service.create(request("user-1", "9a3f")).await.unwrap();

        service.delete("user-1").await.unwrap();
        assert!(service.get("user-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_observe() {
        let service = create_service();
        let user = service.create(request("user-1", "9a3f")).await.unwrap();

        let mut subscription = service.observe("user-1").unwrap();
        assert_eq!(subscription.next().await, Some(Some(user)));

        service.credit("9a3f", 1.0).await.unwrap();
        let snapshot = subscription.next().await.unwrap().unwrap();
        assert_eq!(snapshot.total_money(), 101.0);

        subscription.cancel();
        assert_eq!(subscription.next().await, None);
    }

    #[tokio::test]
    async fn test_repository_errors_propagate() {
        let mut mock = MockUserRepository::new();
        mock.expect_get_user_by_blood_hash()
            .returning(|_| Err(DomainError::storage("disk unavailable")));
        mock.expect_create_user()
            .returning(|_| Err(DomainError::storage("disk unavailable")));

        let service = UserService::new(Arc::new(mock));

        let lookup = service.credit("9a3f", 1.0).await;
        assert!(matches!(lookup, Err(DomainError::Storage { .. })));

        let create = service.create(request("user-1", "9a3f")).await;
        assert!(matches!(create, Err(DomainError::Storage { .. })));
    }

    #[tokio::test]
    async fn test_credit_rewrites_record_with_function_id() {
        let user = User::new(UserId::new("user-1").unwrap(), "9a3f", "9X4F*Z5L", 50.0, 80.0)
            .with_function_id("mari://v1?g=9X4F*Z5L&b=9a3f&rc=50.00&tm=80.00&seal=abcd");

        let mut mock = MockUserRepository::new();
        mock.expect_get_user_by_blood_hash()
            .returning(move |_| Ok(Some(user.clone())));
        mock.expect_update_user()
            .withf(|user| {
                user.total_money() == 100.0
                    && user.function_id()
                        == "mari://v1?g=9X4F*Z5L&b=9a3f&rc=50.00&tm=100.00&seal=abcd"
            })
            .times(1)
            .returning(|_| Ok(()));
        mock.expect_update_balance().never();

        let service = UserService::new(Arc::new(mock));

        let balance = service.credit("9a3f", 20.0).await.unwrap();
        assert_eq!(balance, Some(Balance::new(50.0, 100.0)));
    }

    #[tokio::test]
    async fn test_debit_without_function_id_writes_only_balance() {
        let user = User::new(UserId::new("user-1").unwrap(), "9a3f", "9X4F*Z5L", 50.0, 80.0);

        let mut mock = MockUserRepository::new();
        mock.expect_get_user_by_blood_hash()
            .returning(move |_| Ok(Some(user.clone())));
        mock.expect_update_balance()
            .withf(|id, ready_cash, total_money| {
                id.as_str() == "user-1" && *ready_cash == 30.0 && *total_money == 80.0
            })
            .times(1)
            .returning(|_, _, _| Ok(()));

        let service = UserService::new(Arc::new(mock));

        let balance = service.debit("9a3f", 20.0).await.unwrap();
        assert_eq!(balance, Some(Balance::new(30.0, 80.0)));
    }
}
