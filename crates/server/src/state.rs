use crate::config::ServerConfig;
use contacts::{ContactStore, InMemoryContactStore, StoreError, TimeoutStore};
use std::sync::Arc;

/// Shared application state
///
/// Built once at startup and cloned (cheaply) into every request.
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Persistence adapter (shared across requests; owns the connection pool)
    pub contacts: Arc<dyn ContactStore>,
}

impl ServerState {
    /// Connect the configured backend. Any error here is fatal for the process.
    pub async fn connect(config: ServerConfig) -> Result<Self, StoreError> {
        let contacts = config
            .store_config()
            .build(config.connect_timeout(), config.store_timeout())
            .await?;

        Ok(Self::with_store(config, contacts))
    }

    /// Use an already-built store.
    pub fn with_store(config: ServerConfig, contacts: Arc<dyn ContactStore>) -> Self {
        Self {
            config: Arc::new(config),
            contacts,
        }
    }

    /// In-memory state for tests and local experiments.
    pub fn in_memory(config: ServerConfig) -> Self {
        let store = TimeoutStore::new(InMemoryContactStore::new(), config.store_timeout());
        Self::with_store(config, Arc::new(store))
    }
}
