//! Persistence for users and dolls.
//!
//! Handlers only see the [`Store`] trait. Production runs on [`MySqlStore`];
//! [`MemoryStore`] keeps the same contract in process memory and backs the
//! test suite and database-less development runs.

mod memory;
mod mysql;

use axum::async_trait;
use thiserror::Error;

use crate::models::{Doll, NewDoll, User};

pub use memory::MemoryStore;
pub use mysql::MySqlStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("{0} is out of range")]
    OutOfRange(String),
    #[error("{0}")]
    Inconsistent(String),
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Returns the user with this username, creating it on first login.
    async fn find_or_create_user(
        &self,
        username: &str,
        email: Option<&str>,
    ) -> Result<User, StoreError>;

    async fn find_user(&self, id: i64) -> Result<Option<User>, StoreError>;

    /// Adds to score and coins, returning the updated user. Totals that would
    /// overflow fail with [`StoreError::OutOfRange`] and leave the row untouched.
    async fn add_score(&self, id: i64, score: i64, coins: i64)
        -> Result<Option<User>, StoreError>;

    /// Debits coins only if the balance covers `amount`. Returns whether it did.
    async fn spend_coins(&self, id: i64, amount: i64) -> Result<bool, StoreError>;

    /// Debits energy only if the user has at least `amount`. Returns whether it did.
    async fn spend_energy(&self, id: i64, amount: i64) -> Result<bool, StoreError>;

    /// Adds energy, saturating at `cap`.
    async fn restore_energy(&self, id: i64, amount: i64, cap: i64)
        -> Result<Option<User>, StoreError>;

    async fn insert_doll(&self, doll: NewDoll) -> Result<Doll, StoreError>;

    /// Dolls of one user, newest first.
    async fn dolls_for_user(&self, user_id: i64) -> Result<Vec<Doll>, StoreError>;
}
