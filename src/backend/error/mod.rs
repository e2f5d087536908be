//! Backend Error Module
//!
//! This module defines error types specific to the backend server.
//! These errors are used in HTTP handlers and middleware and are converted
//! to HTTP responses in exactly one place.
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - Error type definitions
//! └── conversion.rs - IntoResponse and the JSON error body
//! ```
//!
//! # Error Types
//!
//! - `BackendError` - Everything a handler or middleware can fail with
//! - `AuthError` - Session check failures (always 403 Unauthorized)
//! - `TokenError` - Token signing failures (500)
//! - `StoreError` - Credential/like store failures
//! - `FederatedError` - Google ID token failures
//! - `StartupError` - Failures while building the application

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

// Re-export commonly used types
pub use types::{AuthError, BackendError, FederatedError, StartupError, StoreError, TokenError};
pub use conversion::ErrorBody;
