//! Error types for agentify

use std::fmt;
use thiserror::Error;

/// Result type alias using AgentifyError
pub type Result<T> = std::result::Result<T, AgentifyError>;

/// Error type alias for convenience
pub type Error = AgentifyError;

/// Exit codes for CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const NOT_FOUND: i32 = 2;
    pub const INVALID_INPUT: i32 = 3;
}

/// Main error type for agentify
#[derive(Debug, Error)]
pub enum AgentifyError {
    #[error("Invalid question: {0}")]
    Validation(String),

    #[error("Retrieval failed: {0}")]
    Retrieval(String),

    #[error("Web search failed: {0}")]
    WebSearch(String),

    #[error("Generation failed: {0}")]
    Generation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("External service error: {0}")]
    ExternalError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Caller-visible failure category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Retrieval,
    WebSearch,
    Generation,
    Config,
    NotFound,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "ValidationFailure",
            Self::Retrieval => "RetrievalFailure",
            Self::WebSearch => "WebSearchFailure",
            Self::Generation => "GenerationFailure",
            Self::Config => "ConfigFailure",
            Self::NotFound => "NotFound",
            Self::Internal => "InternalFailure",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AgentifyError {
    /// Failure category reported to callers
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Retrieval(_) => ErrorKind::Retrieval,
            Self::WebSearch(_) => ErrorKind::WebSearch,
            Self::Generation(_) => ErrorKind::Generation,
            Self::Config(_) => ErrorKind::Config,
            Self::NotFound(_) => ErrorKind::NotFound,
            _ => ErrorKind::Internal,
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self.kind() {
            ErrorKind::NotFound => exit_codes::NOT_FOUND,
            ErrorKind::Validation | ErrorKind::Config => exit_codes::INVALID_INPUT,
            _ => exit_codes::GENERAL_ERROR,
        }
    }
}
