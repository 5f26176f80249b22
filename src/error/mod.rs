use thiserror::Error;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Ranking error: {0}")]
    Ranking(#[from] RankingError),

    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),

    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Storage layer errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database connection failed: {message}")]
    Connection { message: String },

    #[error("Query failed: {message}")]
    Query { message: String },

    #[error("Idea not found: {idea_id}")]
    IdeaNotFound { idea_id: i64 },

    #[error("Migration failed: {message}")]
    Migration { message: String },

    #[error("SQLx error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

/// Sort-order and filter-selection errors.
///
/// These always signal a catalog/client mismatch and are surfaced as
/// request-level failures, never silently defaulted.
#[derive(Debug, Error)]
pub enum RankingError {
    #[error("Unknown sort criterion: {key}")]
    UnknownCriterion { key: String },

    #[error("Unknown filter: {key}")]
    UnknownFilter { key: String },
}

/// RPC protocol errors
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("Unknown method: {method}")]
    UnknownMethod { method: String },

    #[error("Invalid parameters for {method}: {message}")]
    InvalidParameters { method: String, message: String },

    #[error("Method execution failed: {message}")]
    ExecutionFailed { message: String },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<AppError> for RpcError {
    fn from(err: AppError) -> Self {
        match err {
            // A bad sort/filter key is the caller's fault, keep the
            // specific message instead of a generic execution failure.
            AppError::Ranking(e) => RpcError::InvalidRequest {
                message: e.to_string(),
            },
            other => RpcError::ExecutionFailed {
                message: other.to_string(),
            },
        }
    }
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Result type alias for ranking operations
pub type RankingResult<T> = Result<T, RankingError>;

/// Result type alias for RPC operations
pub type RpcResult<T> = Result<T, RpcError>;
