//! Typed error handling for the biztime API
//!
//! Every handler and store returns [`BizTimeError`], so callers can match on
//! the exact failure instead of inspecting a generic `anyhow::Error`.
//!
//! # Error Categories
//!
//! - `NotFound`: a keyed lookup or mutation matched zero rows
//! - `Conflict`: a uniqueness rule or a dependent row blocked the write
//! - `InvalidReference`: a foreign key pointed at a row that does not exist
//! - `InvalidBody`: the JSON body was missing fields or had the wrong types
//! - [`StorageError`]: the backend itself failed
//! - [`ConfigError`]: configuration could not be loaded
//!
//! # Example
//!
//! ```rust,ignore
//! match store.get_company("apple").await {
//!     Ok(Some(company)) => println!("{:?}", company),
//!     Ok(None) => return Err(BizTimeError::not_found("company", "apple")),
//!     Err(BizTimeError::Storage(e)) => eprintln!("backend down: {}", e),
//!     Err(e) => eprintln!("other error: {}", e),
//! }
//! ```

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;

/// Result alias used by stores and handlers
pub type Result<T, E = BizTimeError> = std::result::Result<T, E>;

/// The main error type for the biztime API
#[derive(Debug)]
pub enum BizTimeError {
    /// A keyed lookup or mutation affected zero rows
    NotFound { resource: String, key: String },

    /// Duplicate key, or a delete blocked by dependent rows
    Conflict { resource: String, message: String },

    /// A referenced row does not exist (foreign key violation)
    InvalidReference { resource: String, message: String },

    /// The request body could not be decoded
    InvalidBody { message: String },

    /// Storage backend errors
    Storage(StorageError),

    /// Configuration errors
    Config(ConfigError),

    /// Anything that should not happen in normal operation
    Internal(String),
}

impl BizTimeError {
    pub fn not_found(resource: &str, key: impl ToString) -> Self {
        BizTimeError::NotFound {
            resource: resource.to_string(),
            key: key.to_string(),
        }
    }

    pub fn conflict(resource: &str, message: impl Into<String>) -> Self {
        BizTimeError::Conflict {
            resource: resource.to_string(),
            message: message.into(),
        }
    }

    pub fn invalid_reference(resource: &str, message: impl Into<String>) -> Self {
        BizTimeError::InvalidReference {
            resource: resource.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for BizTimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BizTimeError::NotFound { resource, key } => {
                write!(f, "{} '{}' not found", capitalize(resource), key)
            }
            BizTimeError::Conflict { resource, message } => {
                write!(f, "Conflict on {}: {}", resource, message)
            }
            BizTimeError::InvalidReference { resource, message } => {
                write!(f, "Invalid reference from {}: {}", resource, message)
            }
            BizTimeError::InvalidBody { message } => {
                write!(f, "Invalid request body: {}", message)
            }
            BizTimeError::Storage(e) => write!(f, "{}", e),
            BizTimeError::Config(e) => write!(f, "{}", e),
            BizTimeError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for BizTimeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BizTimeError::Storage(e) => Some(e),
            BizTimeError::Config(e) => Some(e),
            _ => None,
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Inner body of the error envelope
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Human-readable error message
    pub message: String,
    /// HTTP status, repeated in the body for clients that lose the header
    pub status: u16,
    /// Error code for programmatic handling
    pub code: String,
}

/// Error envelope: `{"error": {message, status, code}}`
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

impl BizTimeError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            BizTimeError::NotFound { .. } => StatusCode::NOT_FOUND,
            BizTimeError::Conflict { .. } => StatusCode::CONFLICT,
            BizTimeError::InvalidReference { .. } => StatusCode::BAD_REQUEST,
            BizTimeError::InvalidBody { .. } => StatusCode::BAD_REQUEST,
            BizTimeError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            BizTimeError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            BizTimeError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            BizTimeError::NotFound { .. } => "NOT_FOUND",
            BizTimeError::Conflict { .. } => "CONFLICT",
            BizTimeError::InvalidReference { .. } => "INVALID_REFERENCE",
            BizTimeError::InvalidBody { .. } => "INVALID_BODY",
            BizTimeError::Storage(_) => "STORAGE_ERROR",
            BizTimeError::Config(_) => "CONFIG_ERROR",
            BizTimeError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to the error envelope
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: ErrorBody {
                message: self.to_string(),
                status: self.status_code().as_u16(),
                code: self.error_code().to_string(),
            },
        }
    }
}

impl IntoResponse for BizTimeError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, code = self.error_code(), "request failed");
        } else {
            tracing::debug!(error = %self, code = self.error_code(), "request rejected");
        }
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors raised by a storage backend
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Could not reach the backend
    #[error("Failed to connect to {backend}: {message}")]
    ConnectionError { backend: String, message: String },

    /// A statement failed for a reason other than a constraint violation
    #[error("{backend} query error: {message}")]
    QueryError { backend: String, message: String },

    /// Opening or committing a transaction failed
    #[error("Transaction error: {message}")]
    TransactionError { message: String },

    /// The in-memory lock was poisoned by a panicking writer
    #[error("Storage lock poisoned: {message}")]
    LockPoisoned { message: String },
}

impl From<StorageError> for BizTimeError {
    fn from(err: StorageError) -> Self {
        BizTimeError::Storage(err)
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to parse configuration
    #[error("Failed to parse config{}: {message}", file_suffix(.file))]
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    /// Invalid value in configuration or environment
    #[error("Invalid value '{value}' for '{field}': {message}")]
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    /// IO error while reading configuration
    #[error("IO error: {message}")]
    IoError { message: String },
}

fn file_suffix(file: &Option<String>) -> String {
    file.as_ref()
        .map(|f| format!(" file '{}'", f))
        .unwrap_or_default()
}

impl From<ConfigError> for BizTimeError {
    fn from(err: ConfigError) -> Self {
        BizTimeError::Config(err)
    }
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<JsonRejection> for BizTimeError {
    fn from(rejection: JsonRejection) -> Self {
        BizTimeError::InvalidBody {
            message: rejection.body_text(),
        }
    }
}

impl From<serde_json::Error> for BizTimeError {
    fn from(err: serde_json::Error) -> Self {
        BizTimeError::InvalidBody {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for BizTimeError {
    fn from(err: serde_yaml::Error) -> Self {
        BizTimeError::Config(ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        })
    }
}

impl From<std::io::Error> for BizTimeError {
    fn from(err: std::io::Error) -> Self {
        BizTimeError::Config(ConfigError::IoError {
            message: err.to_string(),
        })
    }
}

/// Convert from anyhow::Error for plumbing code
impl From<anyhow::Error> for BizTimeError {
    fn from(err: anyhow::Error) -> Self {
        BizTimeError::Internal(err.to_string())
    }
}
