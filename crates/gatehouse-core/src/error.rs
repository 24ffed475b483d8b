use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatehouseError {
    #[error("environment variable {0} is not set")]
    MissingEnv(String),

    #[error("environment variable {name} is invalid: {reason}")]
    InvalidEnv { name: String, reason: String },

    #[error("invalid session key: {0}")]
    InvalidKey(String),

    #[error("invalid username '{0}': use 1-32 letters, digits, '.', '_' or '-'")]
    InvalidUsername(String),

    #[error("invalid password: {0}")]
    InvalidPassword(String),

    #[error("username already taken: {0}")]
    UsernameTaken(String),

    /// Unknown user and wrong password share this variant so callers cannot
    /// tell which usernames exist.
    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("user not found: {0}")]
    UserNotFound(i32),

    #[error("invalid session: {0}")]
    InvalidSession(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("password hash error: {0}")]
    PasswordHash(String),

    #[error("background task failed: {0}")]
    Task(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

pub type Result<T> = std::result::Result<T, GatehouseError>;
