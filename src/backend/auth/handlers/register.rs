/**
 * Registration Handler
 *
 * This module implements the user registration handler for POST /api/auth/register.
 *
 * # Registration Process
 *
 * 1. Validate name, email format and password length
 * 2. Hash password using bcrypt
 * 3. Create the user (duplicate emails are rejected by the store)
 * 4. Issue a session token and set the `access_token` cookie
 * 5. Return user info
 *
 * # Validation
 *
 * - Name must not be blank
 * - Email must contain a single '@' with text on both sides
 * - Password must be at least 8 characters long
 */

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use axum_extra::extract::CookieJar;

use crate::backend::auth::handlers::login::start_session;
use crate::backend::auth::handlers::types::{AuthResponse, RegisterRequest};
use crate::backend::auth::users::{hash_password, NewUser, UserStore};
use crate::backend::error::types::INTERNAL_ERROR_MESSAGE;
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;
use crate::shared::{Role, SharedError};

/// Minimum accepted password length
pub const MIN_PASSWORD_LEN: usize = 8;

/// Basic email shape check
pub(crate) fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@') && !email.contains(' ')
        }
        None => false,
    }
}

fn validate(request: &RegisterRequest) -> Result<(), SharedError> {
    if request.name.trim().is_empty() {
        return Err(SharedError::validation("name", "Name is required."));
    }
    if !is_valid_email(&request.email) {
        return Err(SharedError::validation("email", "Email address is invalid."));
    }
    if request.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(SharedError::validation(
            "password",
            format!("Password must be at least {} characters.", MIN_PASSWORD_LEN),
        ));
    }
    Ok(())
}

/// Registration handler
///
/// # Errors
///
/// * `400 Bad Request` - If name, email or password are invalid
/// * `409 Conflict` - If a user with this email already exists
/// * `500 Internal Server Error` - If hashing, the store or token signing fails
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<RegisterRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), BackendError> {
    tracing::info!("Registration request for email: {}", request.email);

    validate(&request)?;

    let password_hash = hash_password(&request.password, state.bcrypt_cost).map_err(|e| {
        tracing::error!("Failed to hash password: {:?}", e);
        BackendError::handler(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
    })?;

    let user = state
        .users
        .create(NewUser {
            name: request.name.trim().to_string(),
            email: request.email,
            password_hash,
            role: Role::User,
            avatar: None,
        })
        .await?;

    let jar = start_session(&state, jar, &user)?;

    tracing::info!("User registered: {} ({})", user.email, user.id);

    Ok((jar, Json(AuthResponse::new("Registration successful.", &user))))
}
