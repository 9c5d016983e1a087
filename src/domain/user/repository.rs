//! User repository trait

use async_trait::async_trait;
use futures::Stream;
use std::fmt::Debug;
use std::pin::Pin;
use std::task::{Context, Poll};

use super::entity::{User, UserId};
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Boxed stream of user snapshots; `None` means the user does not exist
pub type UserStream = Pin<Box<dyn Stream<Item = Option<User>> + Send>>;

/// Live subscription to the changes of a single user
///
/// Yields a snapshot per observed change and never finishes on its own.
/// Calling [`cancel`](Self::cancel) or dropping the subscription releases
/// the underlying source; a cancelled subscription yields end-of-stream.
pub struct UserSubscription {
    stream: Option<UserStream>,
}

impl UserSubscription {
    /// Wrap a snapshot stream
    pub fn new<S>(stream: S) -> Self
    where
        S: Stream<Item = Option<User>> + Send + 'static,
    {
        Self {
            stream: Some(Box::pin(stream)),
        }
    }

    /// Stop receiving snapshots
    pub fn cancel(&mut self) {
        self.stream = None;
    }

    pub fn is_cancelled(&self) -> bool {
        self.stream.is_none()
    }
}

impl Stream for UserSubscription {
    type Item = Option<User>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        match self.stream.as_mut() {
            Some(stream) => stream.as_mut().poll_next(cx),
            None => Poll::Ready(None),
        }
    }
}

impl Debug for UserSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserSubscription")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

/// Repository trait for user storage
///
/// Adapters decide their own conflict and missing-record policies; the
/// only fixed rule is that lookups report a missing user as `Ok(None)`.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepository: Send + Sync + Debug {
    /// Persist a new user
    async fn create_user(&self, user: User) -> Result<(), DomainError>;

    /// Get a user by their ID
    async fn get_user(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Get a user by their blood hash; `None` on zero or ambiguous matches
    async fn get_user_by_blood_hash(&self, blood_hash: &str)
        -> Result<Option<User>, DomainError>;

    /// Replace the stored record for `user.id()` entirely
    async fn update_user(&self, user: &User) -> Result<(), DomainError>;

    /// Remove a user
    async fn delete_user(&self, id: &UserId) -> Result<(), DomainError>;

    /// Subscribe to snapshots of a single user
    ///
    /// Every call returns an independent subscription.
    fn observe_user(&self, id: &UserId) -> Result<UserSubscription, DomainError>;

    /// Overwrite only the two balance fields of a user
    async fn update_balance(
        &self,
        id: &UserId,
        ready_cash: f64,
        total_money: f64,
    ) -> Result<(), DomainError>;
}
