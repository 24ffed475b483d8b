pub mod check_config;
pub mod keygen;
pub mod migrate;
pub mod serve;

use anyhow::Context;
use gatehouse_core::config::ServerConfig;
use std::path::Path;

/// Load the YAML file and apply environment overrides.
pub fn load_config(path: &Path) -> anyhow::Result<ServerConfig> {
    let mut config = ServerConfig::load(path)
        .with_context(|| format!("failed to load config from {}", path.display()))?;
    config.apply_env()?;
    Ok(config)
}
