use anyhow::bail;
use gatehouse_core::config::DatabaseConfig;
use gatehouse_core::user::PgUserStore;
use std::path::Path;

pub fn run(path: &Path) -> anyhow::Result<()> {
    let config = super::load_config(path)?;
    let DatabaseConfig::Postgres { url } = config.database else {
        bail!("database backend is 'memory'; set DATABASE_URL or configure postgres");
    };

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let store = PgUserStore::connect(&url, config.password).await?;
        store.migrate().await?;
        Ok::<_, anyhow::Error>(())
    })
}
