/**
 * Backend Error Types
 *
 * This module defines the error types used by handlers, middleware and
 * stores. Every failure that can reach a client is a `BackendError`, which
 * the conversion module renders into the uniform JSON error body.
 *
 * # Error Categories
 *
 * ## Auth Errors
 *
 * Per-request session failures (missing cookie, bad or expired token,
 * wrong role). All of them render identically as 403 Unauthorized so that
 * a client cannot tell which check failed.
 *
 * ## Token Errors
 *
 * Signing failures. These point at a server misconfiguration and render as
 * a generic 500.
 *
 * ## Store Errors
 *
 * Credential and like store failures (duplicate records, database errors).
 *
 * ## Federated Errors
 *
 * Google ID token checks. A rejected credential renders like any other
 * auth failure; a provider key fetch failure is a 500.
 *
 * ## Startup Errors
 *
 * Everything that stops `create_app` before the router exists.
 */

use thiserror::Error;
use axum::http::StatusCode;
use crate::backend::server::config::ConfigError;
use crate::shared::SharedError;

/// Message used for every authentication and authorization failure
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized";

/// Message used for failures whose details must stay server-side
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error.";

/// Message returned by the federated login route when no client ID is set
pub const FEDERATED_DISABLED_MESSAGE: &str = "Federated login is not configured.";

/// Why a session check rejected a request
///
/// The variant is only ever logged; the client sees the same response
/// for all of them.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// No `access_token` cookie on the request
    #[error("missing session cookie")]
    MissingCredential,

    /// Token is malformed, tampered with, signed with another secret or expired
    #[error("invalid or expired session token")]
    InvalidToken,

    /// Token is valid but the role does not satisfy the route's gate
    #[error("insufficient role for this route")]
    InsufficientRole,
}

/// Failure to produce a session token
#[derive(Debug, Error)]
pub enum TokenError {
    /// The signing key or claims could not be encoded
    #[error("failed to sign session token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

/// Credential or like store failure
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique record already exists (e.g. duplicate email)
    #[error("{0}")]
    Conflict(String),

    /// Underlying database failure
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Federated identity token failure
#[derive(Debug, Error)]
pub enum FederatedError {
    /// No Google client ID configured
    #[error("federated login is not configured")]
    NotConfigured,

    /// Signature, issuer, audience or expiry check failed
    #[error("identity token rejected: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    /// The token names a signing key the provider does not publish
    #[error("identity token signed with unknown key {0:?}")]
    UnknownKey(Option<String>),

    /// The provider has not verified the email in the token
    #[error("identity token email is not verified")]
    UnverifiedEmail,

    /// The provider's signing keys could not be fetched
    #[error("failed to fetch identity provider keys: {0}")]
    KeyFetch(#[from] reqwest::Error),
}

/// Failure to build the application
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("federated login setup failed: {0}")]
    Federated(#[from] FederatedError),

    /// Creating or promoting the admin account failed
    #[error("admin seed failed: {0}")]
    Seed(#[from] StoreError),

    #[error("admin password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
}

/// Backend error returned by handlers and middleware
#[derive(Debug, Error)]
pub enum BackendError {
    /// Handler error with an explicit status (validation, not found, ...)
    #[error("Handler error: {message}")]
    HandlerError {
        /// HTTP status code for this error
        status: StatusCode,
        /// Human-readable error message, shown to the client
        message: String,
    },

    /// Session check failure
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Token signing failure
    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    /// Store failure
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Federated identity failure
    #[error("Federated error: {0}")]
    Federated(#[from] FederatedError),

    /// Shared error (request validation)
    #[error(transparent)]
    SharedError(#[from] SharedError),
}

impl BackendError {
    /// Create a new handler error with a status code
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::HandlerError {
            status,
            message: message.into(),
        }
    }

    /// 404 handler error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::NOT_FOUND, message)
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `HandlerError` - Uses the status code from the error
    /// - `Auth` - 403 Forbidden, whatever the failure kind
    /// - `Token` - 500 Internal Server Error
    /// - `Store` - 409 Conflict for duplicates, 500 otherwise
    /// - `Federated` - 503 when disabled, 500 when keys cannot be fetched,
    ///   403 for any rejected token
    /// - `SharedError` - 400 Bad Request
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::HandlerError { status, .. } => *status,
            Self::Auth(_) => StatusCode::FORBIDDEN,
            Self::Token(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Store(StoreError::Conflict(_)) => StatusCode::CONFLICT,
            Self::Store(StoreError::Database(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Federated(FederatedError::NotConfigured) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Federated(FederatedError::KeyFetch(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Federated(_) => StatusCode::FORBIDDEN,
            Self::SharedError(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Get the client-facing error message
    ///
    /// Internal details (database errors, signing errors, which auth check
    /// failed) are replaced by generic messages.
    pub fn message(&self) -> String {
        match self {
            Self::HandlerError { message, .. } => message.clone(),
            Self::Auth(_) => UNAUTHORIZED_MESSAGE.to_string(),
            Self::Token(_) => INTERNAL_ERROR_MESSAGE.to_string(),
            Self::Store(StoreError::Conflict(message)) => message.clone(),
            Self::Store(StoreError::Database(_)) => INTERNAL_ERROR_MESSAGE.to_string(),
            Self::Federated(FederatedError::NotConfigured) => FEDERATED_DISABLED_MESSAGE.to_string(),
            Self::Federated(FederatedError::KeyFetch(_)) => INTERNAL_ERROR_MESSAGE.to_string(),
            Self::Federated(_) => UNAUTHORIZED_MESSAGE.to_string(),
            Self::SharedError(SharedError::ValidationError { message, .. }) => message.clone(),
        }
    }
}
