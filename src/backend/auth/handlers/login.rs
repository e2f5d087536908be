/**
 * Login Handler
 *
 * This module implements the user authentication handler for POST /api/auth/login.
 *
 * # Authentication Process
 *
 * 1. Look up user by email
 * 2. Verify password using bcrypt
 * 3. Issue a session token and set the `access_token` cookie
 * 4. Return user info
 *
 * # Security
 *
 * - Unknown email and wrong password produce the same response
 * - The token is only sent in an HTTP-only cookie, never in the body
 * - User passwords are never returned in responses
 */
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use axum_extra::extract::CookieJar;

use crate::backend::auth::handlers::types::{AuthResponse, LoginRequest};
use crate::backend::auth::users::{verify_password, User, UserStore};
use crate::backend::error::types::INTERNAL_ERROR_MESSAGE;
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

/// Message for any failed login
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid login credentials.";

fn invalid_credentials() -> BackendError {
    BackendError::not_found(INVALID_CREDENTIALS_MESSAGE)
}

/// Issue a token for `user` and add the session cookie to `jar`
pub(crate) fn start_session(
    state: &AppState,
    jar: CookieJar,
    user: &User,
) -> Result<CookieJar, BackendError> {
    let token = state.tokens.issue(&user.id.to_string(), user.role)?;
    Ok(state.cookies.set(jar, token))
}

/// Login handler
///
/// # Errors
///
/// * `404 Not Found` - If the user is not found or the password is incorrect
/// * `500 Internal Server Error` - If the store, bcrypt or token signing fails
///
/// # Example Request
///
/// ```http
/// POST /api/auth/login HTTP/1.1
/// Content-Type: application/json
///
/// {
///   "email": "user@example.com",
///   "password": "securepassword123"
/// }
/// ```
///
/// # Example Response
///
/// ```json
/// {
///   "success": true,
///   "message": "Login successful.",
///   "user": {
///     "id": "123e4567-e89b-12d3-a456-426614174000",
///     "name": "Ada",
///     "email": "user@example.com",
///     "role": "user"
///   }
/// }
/// ```
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), BackendError> {
    tracing::info!("Login request for: {}", request.email);

    let user = state
        .users
        .find_by_email(&request.email)
        .await?
        .ok_or_else(|| {
            tracing::warn!("User not found: {}", request.email);
            invalid_credentials()
        })?;

    let valid = verify_password(&request.password, &user.password_hash).map_err(|e| {
        tracing::error!("Password verification error: {:?}", e);
        BackendError::handler(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
    })?;

    if !valid {
        tracing::warn!("Invalid password for user: {}", user.email);
        return Err(invalid_credentials());
    }

    let jar = start_session(&state, jar, &user)?;

    tracing::info!("User logged in successfully: {} ({})", user.email, user.role);

    Ok((jar, Json(AuthResponse::new("Login successful.", &user))))
}
