use gatehouse_core::config::ServerConfig;
use gatehouse_core::crypto::Crypto;
use gatehouse_core::user::UserStore;
use std::sync::Arc;
use tera::Tera;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub crypto: Arc<Crypto>,
    pub templates: Arc<Tera>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Assemble state, loading the embedded page templates.
    pub fn new(
        users: Arc<dyn UserStore>,
        crypto: Crypto,
        config: ServerConfig,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            users,
            crypto: Arc::new(crypto),
            templates: Arc::new(crate::templates::load()?),
            config: Arc::new(config),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatehouse_core::user::MemoryUserStore;

    #[test]
    fn new_state_loads_templates() {
        let state = AppState::new(
            Arc::new(MemoryUserStore::default()),
            Crypto::new(vec![0u8; 32]).unwrap(),
            ServerConfig::default(),
        )
        .unwrap();
        assert!(state
            .templates
            .get_template_names()
            .any(|name| name == "index.html"));
        assert_eq!(state.config.session.cookie_name, "session");
    }
}
