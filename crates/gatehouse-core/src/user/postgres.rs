use super::{burn_verify_time, hash_blocking, validate_new, verify_blocking, User, UserStore};
use crate::config::PasswordConfig;
use crate::error::{GatehouseError, Result};
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i32,
    username: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            created_at: row.created_at,
        }
    }
}

/// Postgres-backed accounts.
pub struct PgUserStore {
    pool: PgPool,
    policy: PasswordConfig,
}

impl PgUserStore {
    pub async fn connect(url: &str, policy: PasswordConfig) -> Result<Self> {
        let pool = PgPoolOptions::new().max_connections(8).connect(url).await?;
        tracing::debug!("connected to postgres");
        Ok(Self::with_pool(pool, policy))
    }

    pub fn with_pool(pool: PgPool, policy: PasswordConfig) -> Self {
        Self { pool, policy }
    }

    /// Apply the embedded schema migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::info!("database migrations applied");
        Ok(())
    }
}

#[async_trait::async_trait]
impl UserStore for PgUserStore {
    async fn insert(&self, username: &str, password: &str) -> Result<User> {
        validate_new(&self.policy, username, password)?;
        let password_hash = hash_blocking(password, self.policy.iterations).await?;

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (username, password_hash)
            VALUES ($1, $2)
            RETURNING id, username, password_hash, created_at
            "#,
        )
        .bind(username)
        .bind(&password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                GatehouseError::UsernameTaken(username.to_string())
            }
            other => GatehouseError::Database(other),
        })?;

        Ok(row.into())
    }

    async fn get_and_verify(&self, username: &str, password: &str) -> Result<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, password_hash, created_at
            FROM users
            WHERE lower(username) = lower($1)
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            burn_verify_time(password, self.policy.iterations).await;
            return Err(GatehouseError::InvalidCredentials);
        };
        if verify_blocking(password, &row.password_hash).await? {
            Ok(row.into())
        } else {
            Err(GatehouseError::InvalidCredentials)
        }
    }

    async fn get(&self, id: i32) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, password_hash, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(User::from))
    }

    async fn count(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
