use std::sync::Arc;

use shared_config::AppConfig;
use shared_database::{DocumentStore, MemoryStore};
use shared_realtime::ConnectionRegistry;

/// Everything a handler may touch. Built once in `main` and shared behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<dyn DocumentStore>,
    pub registry: ConnectionRegistry,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn DocumentStore>, registry: ConnectionRegistry) -> Self {
        Self {
            config,
            store,
            registry,
        }
    }

    pub fn in_memory(config: AppConfig) -> Self {
        let registry = ConnectionRegistry::new(config.notification_buffer);
        Self::new(config, Arc::new(MemoryStore::new()), registry)
    }

    pub fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }
}
