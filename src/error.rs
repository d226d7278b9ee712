//! Unified error types for the Google Analytics client.

use reqwest::StatusCode;
use thiserror::Error;

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Authentication-related errors.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Failed to read key file {path}: {source}")]
    KeyFile {
        path: String,
        source: std::io::Error,
    },

    #[error("Malformed service account key: {0}")]
    KeyParse(#[from] serde_json::Error),

    #[error("Failed to sign token assertion: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error("HTTP request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Token request failed with status {status}: {body}")]
    TokenRequestFailed { status: StatusCode, body: String },

    #[error("Failed to create HTTP client: {0}")]
    HttpClientInit(String),
}

/// API request/response errors.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("HTTP request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP error {status}: {body}")]
    HttpError { status: StatusCode, body: String },

    #[error("Google API error {code}: {message}")]
    Google {
        status: StatusCode,
        code: i64,
        message: String,
    },

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Failed to create HTTP client: {0}")]
    HttpClientInit(String),
}

/// Top-level error raised by fetch, formatting and account operations.
#[derive(Debug, Error)]
pub enum GaError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Remote service error: {0}")]
    Remote(#[source] ApiError),

    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),
}

impl From<ApiError> for GaError {
    /// Token failures stay authentication errors even when they surface
    /// through an API call.
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::Auth(auth) => GaError::Auth(auth),
            other => GaError::Remote(other),
        }
    }
}

pub type Result<T, E = GaError> = std::result::Result<T, E>;
