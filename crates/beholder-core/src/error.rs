//! Error types for the Beholder description service.
//!
//! Errors are split by concern so callers can map them to the right HTTP
//! response class: configuration problems, request-level describe failures,
//! and general I/O.

use thiserror::Error;

/// Top-level error type for Beholder operations.
#[derive(Error, Debug)]
pub enum BeholderError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Describe pipeline errors
    #[error("Describe error: {0}")]
    Describe(#[from] DescribeError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Neither credential group is fully populated
    #[error(
        "no VLM credentials found: set AZURE_INFERENCE_ENDPOINT/API_KEY/DEPLOYMENT \
         or AZURE_OPENAI_ENDPOINT/API_KEY/DEPLOYMENT"
    )]
    MissingCredentials,

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Failures of a single describe request, organized by stage.
#[derive(Error, Debug)]
pub enum DescribeError {
    /// Request carried neither inline data nor a URL
    #[error("no image provided: supply image_base64 or image_url")]
    MissingImage,

    /// Remote image download failed
    #[error("failed to fetch image from {url}: {message}")]
    Fetch { url: String, message: String },

    /// VLM invocation failed
    #[error("VLM error: {message}")]
    Vlm {
        message: String,
        status_code: Option<u16>,
    },

    /// VLM call exceeded the per-request deadline
    #[error("VLM call timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
}

impl DescribeError {
    /// Whether this failure is the caller's fault (maps to a 4xx response).
    pub fn is_client_error(&self) -> bool {
        matches!(self, DescribeError::MissingImage)
    }
}

/// Convenience type alias for Beholder results.
pub type Result<T> = std::result::Result<T, BeholderError>;

/// Convenience type alias for describe-pipeline results.
pub type DescribeResult<T> = std::result::Result<T, DescribeError>;
