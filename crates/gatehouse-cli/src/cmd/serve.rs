use anyhow::Context;
use gatehouse_core::config::{DatabaseConfig, WarnLevel};
use gatehouse_core::crypto::Crypto;
use gatehouse_core::user::{MemoryUserStore, PgUserStore, UserStore};
use gatehouse_server::AppState;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

pub fn run(path: &Path, bind: Option<SocketAddr>, memory: bool) -> anyhow::Result<()> {
    let mut config = super::load_config(path)?;
    if let Some(bind) = bind {
        config.bind = bind;
    }
    if memory {
        config.database = DatabaseConfig::Memory;
    }

    for w in config.validate() {
        match w.level {
            WarnLevel::Warning => tracing::warn!("{}", w.message),
            WarnLevel::Error => anyhow::bail!("invalid config: {}", w.message),
        }
    }

    let crypto = Crypto::from_env()
        .context("SESSION_KEY is required; generate one with `gatehouse keygen`")?;

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let users: Arc<dyn UserStore> = match &config.database {
            DatabaseConfig::Postgres { url } => {
                let store = PgUserStore::connect(url, config.password.clone())
                    .await
                    .context("failed to connect to postgres")?;
                store.migrate().await?;
                Arc::new(store)
            }
            DatabaseConfig::Memory => Arc::new(MemoryUserStore::new(config.password.clone())),
        };
        tracing::info!(accounts = users.count().await?, "user store ready");

        let addr = config.bind;
        let state = AppState::new(users, crypto, config)?;
        gatehouse_server::serve(addr, state).await
    })
}
