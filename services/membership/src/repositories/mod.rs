//! Persistence seams for members and session tokens
//!
//! The service only talks to the [`UserStore`] and [`TokenStore`] traits.
//! Writes are field-scoped so that two requests for the same member never
//! overwrite each other's changes.

use async_trait::async_trait;
use common::error::{CacheError, DatabaseError};
use thiserror::Error;

use crate::models::{BillingMonth, Due, Token, User};

pub mod memory;
pub mod postgres;
pub mod redis;

pub use memory::{MemoryTokenStore, MemoryUserStore};
pub use postgres::PgUserStore;
pub use self::redis::RedisTokenStore;

/// Failure of a storage backend
#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    /// A stored document could not be decoded
    #[error("Corrupt stored document: {0}")]
    Corrupt(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Database(DatabaseError::Query(e))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Corrupt(e.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Member documents keyed by username
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find(&self, username: &str) -> StoreResult<Option<User>>;

    /// Insert a new member; `false` when the username is already taken
    async fn insert(&self, user: &User) -> StoreResult<bool>;

    /// Append dues in order, skipping months the member already has
    async fn append_dues(&self, username: &str, dues: &[Due]) -> StoreResult<()>;

    async fn enroll(
        &self,
        username: &str,
        enrolled_date: &str,
        time_slot: &str,
    ) -> StoreResult<()>;

    async fn set_time_slot(&self, username: &str, time_slot: &str) -> StoreResult<()>;

    /// Mark the first due of `month` as paid; `false` when none matched
    async fn mark_due_paid(&self, username: &str, month: BillingMonth) -> StoreResult<bool>;
}

/// Session tokens, reachable by token string and by owner
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn find_by_token(&self, token: &str) -> StoreResult<Option<Token>>;

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<Token>>;

    /// Store `token` as the only token of its owner
    async fn replace_for_user(&self, token: &Token) -> StoreResult<()>;

    async fn delete(&self, token: &str) -> StoreResult<()>;
}
