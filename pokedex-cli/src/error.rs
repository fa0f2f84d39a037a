use thiserror::Error;

use pokedex_api::ApiError;
use pokedex_lib::{QueryError, StoreError};

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Settings could not be loaded or changed
    #[error("Config error: {0}")]
    Config(String),

    /// Runtime creation or async error
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// HTTP client could not be built
    #[error("{0}")]
    Api(#[from] ApiError),

    /// A catalog query failed
    #[error("{0}")]
    Query(#[from] QueryError),

    /// Favorites or settings file error
    #[error("{0}")]
    Store(#[from] StoreError),

    /// Catch-all for other errors
    #[error("{0}")]
    Other(String),
}

impl CliError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub(crate) fn runtime(msg: impl Into<String>) -> Self {
        Self::Runtime(msg.into())
    }

    pub(crate) fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}
