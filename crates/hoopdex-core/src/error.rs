use thiserror::Error;

/// Application-wide error types for hoopdex.
#[derive(Error, Debug)]
pub enum AppError {
    /// HTTP request failed (fetching a page).
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Network/connection error.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Request or navigation timed out.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Headless browser session or tab failure.
    #[error("Browser error: {0}")]
    BrowserError(String),

    /// Markup could not be queried (e.g. a selector failed to compile).
    #[error("Parse error: {0}")]
    ParseError(String),

    /// User-supplied input was rejected before any network access.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Snapshot could not be read or written.
    #[error("Persistence error: {0}")]
    PersistenceError(String),

    /// JSON serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Invalid or missing configuration.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// An index was already published for this process.
    #[error("Player index has already been adopted")]
    AlreadyAdopted,

    /// The operation was cancelled by shutdown.
    #[error("Operation cancelled")]
    Cancelled,

    /// Generic error.
    #[error("{0}")]
    Generic(String),
}

impl AppError {
    /// Returns true if this error came from rendering a remote page.
    pub fn is_fetch_error(&self) -> bool {
        matches!(
            self,
            AppError::HttpError(_)
                | AppError::NetworkError(_)
                | AppError::Timeout(_)
                | AppError::BrowserError(_)
        )
    }
}
