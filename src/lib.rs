//! # Ideavote
//!
//! A citizen-idea listing and vote-analytics service. Ideas are ranked by a
//! per-session chain of sort criteria, restricted by a persisted filter, and
//! their votes are aggregated into a weekly time series for charting.
//!
//! ## Features
//!
//! - **Sort rotation**: clicking a criterion moves it to the front of the
//!   precedence chain; clicking the leading criterion flips its direction
//! - **Persisted filters**: one active idea-state filter per session
//! - **Vote flow**: weekly vote buckets for the ten most-voted ideas plus a
//!   per-idea engagement summary in a compact charting format
//! - **Idea lifecycle**: create, update, and detail operations backed by
//!   SQLite
//!
//! ## Architecture
//!
//! ```text
//! RPC Client → JSON-RPC server (stdio) → Idea / VoteFlow services
//!                        ↓
//!                 SQLite (ideas, votes, session state)
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use ideavote::{Config, AppState, RpcServer};
//! use ideavote::storage::SqliteStorage;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env();
//!     let storage = SqliteStorage::new(&config.database).await?;
//!     let state = Arc::new(AppState::new(config, storage));
//!     let server = RpcServer::new(state);
//!     server.run().await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

/// Vote-flow aggregation engine and service.
pub mod analytics;
/// Static catalog of sort criteria and directions.
pub mod catalog;
/// Configuration management.
pub mod config;
/// Error types and result aliases for the application.
pub mod error;
/// Idea listing and lifecycle services.
pub mod ideas;
/// Per-session sort-order and filter state.
pub mod ranking;
/// JSON-RPC server implementation and request handling.
pub mod server;
/// SQLite storage layer for persistence.
pub mod storage;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use server::{AppState, RpcServer, SharedState};
