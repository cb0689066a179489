//! Error types for `bugtrack-lib`.

use std::path::PathBuf;
use thiserror::Error;

/// Primary error type for bugtrack operations.
#[derive(Error, Debug)]
pub enum BugError {
    // === Record Errors ===
    /// Bug with the specified ID was not found.
    #[error("Bug not found: {id}")]
    BugNotFound { id: u32 },

    /// Text does not name a bug field.
    #[error("Invalid field: {field}")]
    InvalidField { field: String },

    // === Validation Errors ===
    /// Field validation failed.
    #[error("Validation failed: {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Multiple validation errors occurred.
    #[error("Validation errors: {errors:?}")]
    ValidationErrors { errors: Vec<ValidationError> },

    /// Invalid status value.
    #[error("Invalid status: {status}")]
    InvalidStatus { status: String },

    /// Invalid priority value.
    #[error("Invalid priority: {priority}")]
    InvalidPriority { priority: String },

    /// Invalid role value.
    #[error("Invalid role: {role}")]
    InvalidRole { role: String },

    // === Flat File Errors ===
    /// A line in the bug file could not be parsed.
    #[error("Malformed line {line}: {reason}")]
    MalformedLine { line: usize, reason: String },

    // === Account Errors ===
    /// Attempted to sign up with a username that is already taken.
    #[error("Username already exists: {username}")]
    UserExists { username: String },

    /// No account with that username.
    #[error("User not found: {username}")]
    UserNotFound { username: String },

    /// Username/password pair did not match.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Operation requires a logged-in user.
    #[error("Login required: pass --user and --password")]
    NotAuthenticated,

    /// The user's role does not grant the operation.
    #[error("Access denied: {role} cannot {action}")]
    AccessDenied { role: String, action: String },

    // === Configuration Errors ===
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Workspace already has a configuration file.
    #[error("Already initialized: {path}")]
    AlreadyInitialized { path: PathBuf },

    // === Storage Errors ===
    /// Generic storage error.
    #[error("Storage error: {0}")]
    Storage(String),

    // === I/O Errors ===
    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A single field validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

impl BugError {
    #[must_use]
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn from_validation_errors(errors: Vec<ValidationError>) -> Self {
        if errors.len() == 1 {
            let err = &errors[0];
            Self::Validation {
                field: err.field.clone(),
                reason: err.message.clone(),
            }
        } else {
            Self::ValidationErrors { errors }
        }
    }
}

/// Result type using `BugError`.
pub type Result<T> = std::result::Result<T, BugError>;
