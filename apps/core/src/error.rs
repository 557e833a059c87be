use thiserror::Error;

/// Application-wide error type, consolidating all possible errors into a single enum.
///
/// None of these ever reach the end user in place of a verdict: validation
/// errors are returned at the input boundary, everything else is absorbed by the
/// scoring fallback chain.
#[derive(Debug, Error, Clone)]
pub enum AppError {
    /// Represents data validation errors (e.g., invalid input format).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Represents configuration-related errors (e.g., malformed environment variables).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Represents failures of an external scoring delegate (transport, status, payload).
    #[error("Remote scorer error: {0}")]
    Remote(String),

    /// Represents unexpected internal errors that indicate a bug.
    #[error("Internal error: {0}")]
    Internal(String),

    /// Represents errors from operations that did not complete in time.
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// A lookup by identifier found nothing.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<tokio::time::error::Elapsed> for AppError {
    fn from(err: tokio::time::error::Elapsed) -> Self {
        AppError::Timeout(format!("Operation timed out: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Validation(format!("JSON error: {}", err))
    }
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        AppError::Config(format!("URL parse error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(format!("Validation errors: {}", err))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::Timeout(format!("HTTP request timed out: {}", err))
        } else {
            AppError::Remote(format!("HTTP error: {}", err))
        }
    }
}

/// Convenience alias used across the crate.
pub type AppResult<T> = Result<T, AppError>;
