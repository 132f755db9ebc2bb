//! Error types for the vrg command-line client.

use thiserror::Error;

/// Process exit codes. Stable across releases; scripts depend on them.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CONFIG: i32 = 3;
    pub const AUTH: i32 = 4;
    pub const FORBIDDEN: i32 = 5;
    pub const NOT_FOUND: i32 = 6;
    pub const CONFLICT: i32 = 7;
    pub const VALIDATION: i32 = 8;
    pub const TIMEOUT: i32 = 9;
    pub const CONNECTION: i32 = 10;
}

/// Errors surfaced by commands, the API client, and configuration loading.
#[derive(Debug, Error)]
pub enum VrgError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("{resource} not found: {identifier}")]
    NotFound {
        resource: &'static str,
        identifier: String,
    },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    #[error("Permission denied: {0}")]
    Forbidden(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Failed to read user input: {0}")]
    Prompt(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl VrgError {
    pub fn not_found(resource: &'static str, identifier: impl Into<String>) -> Self {
        VrgError::NotFound {
            resource,
            identifier: identifier.into(),
        }
    }

    /// Exit status the binary reports for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            VrgError::Validation(_) => exit_code::VALIDATION,
            VrgError::NotFound { .. } => exit_code::NOT_FOUND,
            VrgError::Conflict(_) => exit_code::CONFLICT,
            VrgError::ConfigError(_) => exit_code::CONFIG,
            VrgError::AuthFailed(_) => exit_code::AUTH,
            VrgError::Forbidden(_) => exit_code::FORBIDDEN,
            VrgError::Timeout(_) => exit_code::TIMEOUT,
            VrgError::Connection(_) => exit_code::CONNECTION,
            VrgError::Api { .. }
            | VrgError::Transport(_)
            | VrgError::Prompt(_)
            | VrgError::IoError(_) => exit_code::GENERAL,
        }
    }
}

impl From<config::ConfigError> for VrgError {
    fn from(err: config::ConfigError) -> Self {
        VrgError::ConfigError(err.to_string())
    }
}
