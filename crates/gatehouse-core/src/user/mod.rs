//! Account storage.
//!
//! [`UserStore`] is the seam between the HTTP layer and persistence. Two
//! backends exist: [`PgUserStore`] for production and [`MemoryUserStore`]
//! for development and tests.

mod memory;
mod postgres;

pub use memory::MemoryUserStore;
pub use postgres::PgUserStore;

use crate::config::PasswordConfig;
use crate::credentials::{validate_password, validate_username};
use crate::error::{GatehouseError, Result};
use crate::password;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered account. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

#[async_trait::async_trait]
pub trait UserStore: Send + Sync {
    /// Validate, hash and store a new account.
    async fn insert(&self, username: &str, password: &str) -> Result<User>;

    /// Look up an account by username and check its password.
    async fn get_and_verify(&self, username: &str, password: &str) -> Result<User>;

    async fn get(&self, id: i32) -> Result<Option<User>>;

    /// Like [`UserStore::get`] but a missing account is an error.
    async fn require(&self, id: i32) -> Result<User> {
        self.get(id).await?.ok_or(GatehouseError::UserNotFound(id))
    }

    async fn count(&self) -> Result<i64>;
}

// ---------------------------------------------------------------------------
// Helpers shared by the backends
// ---------------------------------------------------------------------------

fn validate_new(policy: &PasswordConfig, username: &str, password: &str) -> Result<()> {
    validate_username(username)?;
    validate_password(password, policy.min_length)
}

/// PBKDF2 is deliberately slow, so keep it off the async worker threads.
async fn hash_blocking(password: &str, iterations: u32) -> Result<String> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || password::hash_password(&password, iterations))
        .await
        .map_err(|e| GatehouseError::Task(e.to_string()))?
}

async fn verify_blocking(password: &str, encoded: &str) -> Result<bool> {
    let password = password.to_string();
    let encoded = encoded.to_string();
    tokio::task::spawn_blocking(move || password::verify_password(&password, &encoded))
        .await
        .map_err(|e| GatehouseError::Task(e.to_string()))?
}

/// Spend roughly the same time on unknown usernames as on real ones.
async fn burn_verify_time(password: &str, iterations: u32) {
    let _ = hash_blocking(password, iterations).await;
}
