/// Errors that can occur while talking to the catalog API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Catalog API returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Resource not found: {url}")]
    NotFound { url: String },

    #[error("Unexpected response: {0}")]
    Parse(String),

    #[error("Invalid resource id: {0}")]
    InvalidId(String),
}

impl ApiError {
    /// True for transport failures and non-2xx responses other than 404.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Status { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
