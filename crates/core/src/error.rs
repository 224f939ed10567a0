//! Error types for the LeGM domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum.

use thiserror::Error;

/// The top-level error type for LeGM operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Stats error: {0}")]
    Stats(#[from] StatsError),

    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    #[error("Chart error: {0}")]
    Chart(#[from] ChartError),

    #[error("Social platform error: {0}")]
    Social(#[from] SocialError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Model gateway failures. These propagate out of the analysis loop.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// Stats backend failures.
///
/// `NotFound` is the resolution error: a player or team name could not be
/// identified, or no data exists for it. Its message is shown to the model
/// verbatim.
#[derive(Debug, Clone, Error)]
pub enum StatsError {
    #[error("{0}")]
    NotFound(String),

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl StatsError {
    /// Whether retrying the same request could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, StatsError::Transport(_))
    }
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    NotFound(String),

    #[error("Invalid tool arguments: {0}")]
    InvalidArguments(String),

    #[error(transparent)]
    Stats(#[from] StatsError),
}

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("Chart rendering failed: {0}")]
    RenderFailed(String),

    #[error("Invalid chart spec: {0}")]
    InvalidSpec(String),
}

#[derive(Debug, Error)]
pub enum SocialError {
    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),
}

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Storage error: {0}")]
    Storage(String),
}
