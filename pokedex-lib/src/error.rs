use std::sync::Arc;

use thiserror::Error;

use pokedex_api::ApiError;

/// Errors produced by cached queries.
///
/// `Clone` because a single-flight load hands the same outcome to every
/// caller that attached to it.
#[derive(Debug, Clone, Error)]
pub enum QueryError {
    /// The underlying API call failed
    #[error("{0}")]
    Api(Arc<ApiError>),

    /// A key was read back as a different type than it was stored with
    #[error("Cached value for {key} has a different type")]
    TypeMismatch { key: String },

    /// The load was cancelled before it settled (cache cleared or session shut down)
    #[error("Query {key} was cancelled before it settled")]
    Abandoned { key: String },
}

impl QueryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api(e) if e.is_not_found())
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Self::Api(e) if e.is_network())
    }
}

impl From<ApiError> for QueryError {
    fn from(e: ApiError) -> Self {
        Self::Api(Arc::new(e))
    }
}

/// Errors from the local settings and favorites files.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Favorites file is not valid JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Settings file is not valid TOML
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Settings could not be written or a value was rejected
    #[error("Config error: {0}")]
    Config(String),
}

impl StoreError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
