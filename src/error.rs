//! Error types for the support orchestrator

use thiserror::Error;

/// Result type alias using the orchestrator's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the orchestrator
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// LLM provider error
    #[error("LLM provider error: {0}")]
    Provider(String),

    /// Tool-server (JSON-RPC) error
    #[error("Tool server error: {0}")]
    ToolServer(String),

    /// Messaging-platform API error
    #[error("Messaging platform error: {0}")]
    Platform(String),

    /// Validation-service error
    #[error("Validation service error: {0}")]
    Validation(String),

    /// Prompt-registry error
    #[error("Prompt registry error: {0}")]
    Prompt(String),

    /// A tool call's parameters failed JSON-schema validation
    #[error("Schema validation failed for tool '{tool}': {reason}")]
    SchemaValidation { tool: String, reason: String },

    /// Connection setup failure (transport-level)
    #[error("Connection error: {0}")]
    Connection(String),

    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Environment variable error
    #[error("Environment error: {0}")]
    Env(#[from] std::env::VarError),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unauthorized access
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    /// Timeout error
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::Http(_) | Error::RateLimit(_) | Error::Timeout(_)
        )
    }

    /// Check if error is a client error (caller's fault)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidInput(_) | Error::NotFound(_) | Error::Unauthorized(_)
        )
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Error::Config(err.to_string())
    }
}
