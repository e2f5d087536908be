//! Shared Error Types
//!
//! This module defines error types that are shared between the server and
//! any client consuming the shared payload types.
//!
//! # Error Categories
//!
//! - `ValidationError` - Data validation failures (request fields)
//!
//! # Usage
//!
//! ```rust
//! use blogpress::shared::error::SharedError;
//!
//! let error = SharedError::validation("email", "Email address is invalid");
//! assert!(error.to_string().contains("email"));
//! ```
use thiserror::Error;

/// Shared error types
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// Data validation error
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },
}

impl SharedError {
    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }
}
