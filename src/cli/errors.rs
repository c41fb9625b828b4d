//! CLI-specific error types
//!
//! Errors loading config or rows end the process. Errors on a single query
//! request are reported in-band and the session continues.

use std::io;

use thiserror::Error;

use crate::index::IndexError;

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration file unreadable or invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Index parameters rejected
    #[error("{0}")]
    Index(#[from] IndexError),

    /// Rows file has an unsupported shape
    #[error("Invalid rows file: {0}")]
    InvalidRows(String),

    /// Query request could not be understood
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// stdin/stdout or file I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            CliError::Config(_) => "TIDX_CLI_CONFIG_ERROR",
            CliError::Index(e) => e.code().code(),
            CliError::InvalidRows(_) => "TIDX_CLI_INVALID_ROWS",
            CliError::InvalidRequest(_) => "TIDX_CLI_INVALID_REQUEST",
            CliError::Io(_) => "TIDX_CLI_IO_ERROR",
            CliError::Json(_) => "TIDX_CLI_JSON_ERROR",
        }
    }
}
