use crate::error::{GatehouseError, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// DatabaseConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum DatabaseConfig {
    Postgres {
        url: String,
    },
    /// Accounts live only as long as the process. Meant for development.
    #[default]
    Memory,
}

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_ttl_hours")]
    pub ttl_hours: u32,
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    #[serde(default)]
    pub secure: bool,
}

/// Ten years. Longer lifetimes are rejected by [`ServerConfig::validate`].
pub const MAX_TTL_HOURS: u32 = 10 * 365 * 24;

fn default_ttl_hours() -> u32 {
    720
}

fn default_cookie_name() -> String {
    "session".to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_hours: default_ttl_hours(),
            cookie_name: default_cookie_name(),
            secure: false,
        }
    }
}

impl SessionConfig {
    pub fn ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(i64::from(self.ttl_hours))
    }
}

// ---------------------------------------------------------------------------
// PasswordConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordConfig {
    #[serde(default = "default_min_length")]
    pub min_length: usize,
    #[serde(default = "default_iterations")]
    pub iterations: u32,
}

fn default_min_length() -> usize {
    8
}

fn default_iterations() -> u32 {
    100_000
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            min_length: default_min_length(),
            iterations: default_iterations(),
        }
    }
}

// ---------------------------------------------------------------------------
// ServerConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: SocketAddr,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub password: PasswordConfig,
}

fn default_bind() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8000))
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            database: DatabaseConfig::default(),
            session: SessionConfig::default(),
            password: PasswordConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load from a YAML file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(data) => Ok(serde_yaml::from_str(&data)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Apply `DATABASE_URL` and `GATEHOUSE_BIND` from the process environment.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_from(|name| std::env::var(name).ok())
    }

    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(url) = lookup("DATABASE_URL").filter(|u| !u.is_empty()) {
            self.database = DatabaseConfig::Postgres { url };
        }
        if let Some(bind) = lookup("GATEHOUSE_BIND") {
            self.bind = bind.parse().map_err(|e| GatehouseError::InvalidEnv {
                name: "GATEHOUSE_BIND".to_string(),
                reason: format!("{e}"),
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.session.ttl_hours == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "session.ttl_hours must be greater than 0".to_string(),
            });
        }
        if self.session.ttl_hours > MAX_TTL_HOURS {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!(
                    "session.ttl_hours is {}; the maximum is {MAX_TTL_HOURS}",
                    self.session.ttl_hours
                ),
            });
        }
        if self.session.cookie_name.trim().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "session.cookie_name must not be empty".to_string(),
            });
        }
        if self.password.min_length < 8 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "password.min_length is {}; 8 or more is recommended",
                    self.password.min_length
                ),
            });
        }
        if self.password.iterations < 10_000 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "password.iterations is {}; 10000 or more is recommended",
                    self.password.iterations
                ),
            });
        }
        if self.database == DatabaseConfig::Memory {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "database backend is 'memory'; accounts are lost on restart"
                    .to_string(),
            });
        }

        warnings
    }
}

/// Read a required environment variable.
pub fn env_var(name: &str) -> Result<String> {
    std::env::var(name).map_err(|_| GatehouseError::MissingEnv(name.to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
