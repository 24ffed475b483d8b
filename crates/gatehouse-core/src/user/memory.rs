use super::{burn_verify_time, hash_blocking, validate_new, verify_blocking, User, UserStore};
use crate::config::PasswordConfig;
use crate::error::{GatehouseError, Result};
use chrono::Utc;
use tokio::sync::RwLock;

struct StoredUser {
    user: User,
    password_hash: String,
}

/// In-memory accounts (for development or tests). Ids start at 1.
pub struct MemoryUserStore {
    policy: PasswordConfig,
    users: RwLock<Vec<StoredUser>>,
}

impl MemoryUserStore {
    pub fn new(policy: PasswordConfig) -> Self {
        Self {
            policy,
            users: RwLock::new(Vec::new()),
        }
    }
}

impl Default for MemoryUserStore {
    fn default() -> Self {
        Self::new(PasswordConfig::default())
    }
}

#[async_trait::async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, username: &str, password: &str) -> Result<User> {
        validate_new(&self.policy, username, password)?;
        let password_hash = hash_blocking(password, self.policy.iterations).await?;

        let mut users = self.users.write().await;
        if users
            .iter()
            .any(|u| u.user.username.eq_ignore_ascii_case(username))
        {
            return Err(GatehouseError::UsernameTaken(username.to_string()));
        }
        let user = User {
            id: users.len() as i32 + 1,
            username: username.to_string(),
            created_at: Utc::now(),
        };
        users.push(StoredUser {
            user: user.clone(),
            password_hash,
        });
        Ok(user)
    }

    async fn get_and_verify(&self, username: &str, password: &str) -> Result<User> {
        let found = {
            let users = self.users.read().await;
            users
                .iter()
                .find(|u| u.user.username.eq_ignore_ascii_case(username))
                .map(|u| (u.user.clone(), u.password_hash.clone()))
        };
        let Some((user, password_hash)) = found else {
            burn_verify_time(password, self.policy.iterations).await;
            return Err(GatehouseError::InvalidCredentials);
        };
        if verify_blocking(password, &password_hash).await? {
            Ok(user)
        } else {
            Err(GatehouseError::InvalidCredentials)
        }
    }

    async fn get(&self, id: i32) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.user.id == id).map(|u| u.user.clone()))
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.users.read().await.len() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> MemoryUserStore {
        MemoryUserStore::new(PasswordConfig {
            min_length: 8,
            iterations: 1_000,
        })
    }

    #[tokio::test]
    async fn insert_assigns_sequential_ids() {
        let store = store();
        let a = store.insert("alice", "password-a").await.unwrap();
        let b = store.insert("bob", "password-b").await.unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected_case_insensitively() {
        let store = store();
        store.insert("alice", "password-a").await.unwrap();
        let err = store.insert("ALICE", "password-b").await.unwrap_err();
        assert!(matches!(err, GatehouseError::UsernameTaken(_)));
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn invalid_input_is_rejected_before_storing() {
        let store = store();
        assert!(matches!(
            store.insert("bad name", "password-a").await,
            Err(GatehouseError::InvalidUsername(_))
        ));
        assert!(matches!(
            store.insert("carol", "short").await,
            Err(GatehouseError::InvalidPassword(_))
        ));
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn verify_accepts_right_password_only() {
        let store = store();
        let alice = store.insert("alice", "password-a").await.unwrap();
        assert_eq!(store.get_and_verify("alice", "password-a").await.unwrap(), alice);
        assert_eq!(store.get_and_verify("Alice", "password-a").await.unwrap(), alice);
        assert!(matches!(
            store.get_and_verify("alice", "password-b").await,
            Err(GatehouseError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn unknown_user_looks_like_bad_password() {
        let store = store();
        assert!(matches!(
            store.get_and_verify("nobody", "password-x").await,
            Err(GatehouseError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn get_by_id() {
        let store = store();
        let alice = store.insert("alice", "password-a").await.unwrap();
        assert_eq!(store.get(alice.id).await.unwrap(), Some(alice));
        assert_eq!(store.get(99).await.unwrap(), None);
        assert!(matches!(
            store.require(99).await,
            Err(GatehouseError::UserNotFound(99))
        ));
    }
}
