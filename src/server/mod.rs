//! Server module for JSON-RPC request handling.
//!
//! This module provides:
//! - JSON-RPC 2.0 server over stdio
//! - Method routing and handlers
//! - Shared application state

mod handlers;
mod rpc;

pub use handlers::*;
pub use rpc::*;

use std::sync::Arc;

use crate::analytics::VoteFlowService;
use crate::config::Config;
use crate::ideas::IdeaService;
use crate::storage::SqliteStorage;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// SQLite storage backend.
    pub storage: SqliteStorage,
    /// Idea listing and lifecycle service.
    pub ideas: IdeaService,
    /// Vote-flow analytics service.
    pub analytics: VoteFlowService,
}

impl AppState {
    /// Create new application state
    pub fn new(config: Config, storage: SqliteStorage) -> Self {
        let ideas = IdeaService::new(storage.clone(), config.listing.clone());
        let analytics = VoteFlowService::new(storage.clone());

        Self {
            config,
            storage,
            ideas,
            analytics,
        }
    }
}

/// Shared application state handle
pub type SharedState = Arc<AppState>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DatabaseConfig, ListingConfig, LogFormat, LoggingConfig};
    use std::path::PathBuf;

    pub(crate) fn test_config() -> Config {
        Config {
            database: DatabaseConfig {
                path: PathBuf::from(":memory:"),
                max_connections: 5,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: LogFormat::Pretty,
            },
            listing: ListingConfig::default(),
        }
    }

    #[tokio::test]
    async fn test_app_state_new() {
        let storage = SqliteStorage::new_in_memory().await.unwrap();
        let state = AppState::new(test_config(), storage);

        assert_eq!(state.config.listing.page_size, 30);
    }

    #[tokio::test]
    async fn test_shared_state_clone() {
        let storage = SqliteStorage::new_in_memory().await.unwrap();
        let state: SharedState = Arc::new(AppState::new(test_config(), storage));

        let state2 = Arc::clone(&state);
        assert_eq!(Arc::strong_count(&state), 2);
        drop(state2);
        assert_eq!(Arc::strong_count(&state), 1);
    }
}
