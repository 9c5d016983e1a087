//! In-memory user repository implementation

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, warn};

use crate::domain::user::{Balance, User, UserId, UserRepository, UserSubscription};
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct UserTable {
    users: HashMap<String, User>,
    /// Index for blood hash -> user IDs lookup
    blood_hash_index: HashMap<String, HashSet<String>>,
    /// One channel per observed user ID
    watchers: HashMap<String, watch::Sender<Option<User>>>,
}

impl UserTable {
    fn index(&mut self, user: &User) {
        self.blood_hash_index
            .entry(user.blood_hash().to_string())
            .or_default()
            .insert(user.id().as_str().to_string());
    }

    fn unindex(&mut self, user: &User) {
        if let Some(ids) = self.blood_hash_index.get_mut(user.blood_hash()) {
            ids.remove(user.id().as_str());

            if ids.is_empty() {
                self.blood_hash_index.remove(user.blood_hash());
            }
        }
    }

    fn notify(&self, id: &str) {
        if let Some(sender) = self.watchers.get(id) {
            sender.send_replace(self.users.get(id).cloned());
        }
    }
}

/// In-memory implementation of UserRepository
///
/// - duplicate `create_user` is a conflict
/// - `update_user` and `update_balance` on a missing user are not-found errors
/// - `delete_user` on a missing user is a no-op
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    table: RwLock<UserTable>,
}

impl InMemoryUserRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository with initial users
    ///
    /// Later entries replace earlier ones with the same ID.
    pub fn with_users(users: Vec<User>) -> Self {
        let mut table = UserTable::default();

        for user in users {
            if let Some(previous) = table.users.remove(user.id().as_str()) {
                table.unindex(&previous);
            }

            table.index(&user);
            table.users.insert(user.id().as_str().to_string(), user);
        }

        Self {
            table: RwLock::new(table),
        }
    }

    /// Number of stored users
    pub fn len(&self) -> Result<usize, DomainError> {
        Ok(self.read()?.users.len())
    }

    pub fn is_empty(&self) -> Result<bool, DomainError> {
        Ok(self.len()? == 0)
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, UserTable>, DomainError> {
        self.table
            .read()
            .map_err(|_| DomainError::internal("Failed to acquire lock"))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, UserTable>, DomainError> {
        self.table
            .write()
            .map_err(|_| DomainError::internal("Failed to acquire lock"))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create_user(&self, user: User) -> Result<(), DomainError> {
        let mut table = self.write()?;
        let id = user.id().as_str().to_string();

        if table.users.contains_key(&id) {
            return Err(DomainError::conflict(format!(
                "User with ID '{}' already exists",
                id
            )));
        }

        table.index(&user);
        table.users.insert(id.clone(), user);
        table.notify(&id);

        debug!(user_id = %id, "Created user");
        Ok(())
    }

    async fn get_user(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let table = self.read()?;
        Ok(table.users.get(id.as_str()).cloned())
    }

    async fn get_user_by_blood_hash(
        &self,
        blood_hash: &str,
    ) -> Result<Option<User>, DomainError> {
        let table = self.read()?;

        let Some(ids) = table.blood_hash_index.get(blood_hash) else {
            return Ok(None);
        };

        if ids.len() > 1 {
            warn!(
                blood_hash = %blood_hash,
                matches = ids.len(),
                "Ambiguous blood hash lookup"
            );
            return Ok(None);
        }

        Ok(ids.iter().next().and_then(|id| table.users.get(id)).cloned())
    }

    async fn update_user(&self, user: &User) -> Result<(), DomainError> {
        let mut table = self.write()?;
        let id = user.id().as_str().to_string();

        let Some(previous) = table.users.remove(&id) else {
            return Err(DomainError::not_found(format!("User '{}' not found", id)));
        };

        table.unindex(&previous);
        table.index(user);
        table.users.insert(id.clone(), user.clone());
        table.notify(&id);

        debug!(user_id = %id, "Updated user");
        Ok(())
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), DomainError> {
        let mut table = self.write()?;

        match table.users.remove(id.as_str()) {
            Some(user) => {
                table.unindex(&user);
                table.notify(id.as_str());
                debug!(user_id = %id, "Deleted user");
            }
            None => debug!(user_id = %id, "Delete of unknown user ignored"),
        }

        Ok(())
    }

    fn observe_user(&self, id: &UserId) -> Result<UserSubscription, DomainError> {
        let mut table = self.write()?;

        table.watchers.retain(|_, sender| sender.receiver_count() > 0);

        let current = table.users.get(id.as_str()).cloned();
        let receiver = table
            .watchers
            .entry(id.as_str().to_string())
            .or_insert_with(|| watch::channel(current).0)
            .subscribe();

        debug!(user_id = %id, "New user subscription");
        Ok(UserSubscription::new(WatchStream::new(receiver)))
    }

    async fn update_balance(
        &self,
        id: &UserId,
        ready_cash: f64,
        total_money: f64,
    ) -> Result<(), DomainError> {
        let mut table = self.write()?;

        let Some(user) = table.users.get_mut(id.as_str()) else {
            return Err(DomainError::not_found(format!("User '{}' not found", id)));
        };

        user.replace_balance(Balance::new(ready_cash, total_money));
        table.notify(id.as_str());

        debug!(user_id = %id, ready_cash, total_money, "Updated balance");
        Ok(())
    }
}
