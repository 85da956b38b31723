//! Core error types for massage2go-core.
//!
//! Every fallible operation in the library returns one of these types.
//! Form-level problems carry the message shown to the user inline.

use std::path::PathBuf;
use thiserror::Error;

use crate::booking::BookingStage;

/// Core error type for massage2go-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Storage-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Form and input validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Booking lifecycle errors
    #[error("Booking error: {0}")]
    Booking(#[from] BookingError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Key-value store errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Validation errors. The `Display` text is what a form shows inline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A required form field was left empty
    #[error("{field} is required")]
    MissingField { field: &'static str },

    /// Password and confirmation differ
    #[error("Passwords do not match")]
    PasswordMismatch,

    /// Password shorter than the minimum length
    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    /// Terms and conditions not accepted
    #[error("You must accept the terms and conditions")]
    TermsNotAccepted,

    /// Invalid value
    #[error("{message}")]
    InvalidValue { field: &'static str, message: String },
}

/// Errors raised by the booking lifecycle.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BookingError {
    /// The requested action is not valid from the current stage
    #[error("cannot {action} while booking is {stage}")]
    InvalidTransition {
        stage: BookingStage,
        action: &'static str,
    },

    /// Therapist offers no services, so the "Book Now" action is disabled
    #[error("therapist '{0}' has no services and cannot be booked")]
    NotBookable(String),

    #[error("unknown therapist: {0}")]
    UnknownTherapist(String),

    #[error("unknown service: {0}")]
    UnknownService(String),

    /// Star rating outside 1..=5
    #[error("rating must be between 1 and 5, got {0}")]
    InvalidRating(u8),
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(inner, _msg)
                if inner.code == rusqlite::ErrorCode::DatabaseBusy
                    || inner.code == rusqlite::ErrorCode::DatabaseLocked =>
            {
                DatabaseError::Locked
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
