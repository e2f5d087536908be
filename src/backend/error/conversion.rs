/**
 * Error Conversion
 *
 * This module is the single translation layer from `BackendError` to an
 * HTTP response. Handlers and middleware return typed errors; only this
 * `IntoResponse` implementation knows the wire shape.
 *
 * # Response Format
 *
 * ```json
 * {
 *   "success": false,
 *   "statusCode": 403,
 *   "message": "Unauthorized"
 * }
 * ```
 *
 * The HTTP status always mirrors `statusCode`.
 */

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use crate::backend::error::types::BackendError;

/// Uniform JSON error body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    /// Always `false`
    pub success: bool,
    /// Mirrors the HTTP status
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    /// Client-facing message
    pub message: String,
}

impl ErrorBody {
    /// Build the body for a status and message
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            success: false,
            status_code: status.as_u16(),
            message: message.into(),
        }
    }
}

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // The full error (with internals) only goes to the log
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        (status, Json(ErrorBody::new(status, self.message()))).into_response()
    }
}
