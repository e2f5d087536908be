/**
 * Federated Login Handler
 *
 * POST /api/auth/google-login receives the ID token that the client got
 * from Google sign-in. The token is verified against Google's keys and the
 * configured client ID; only then is the account looked up by the token's
 * verified email. On first use the account is created with a random
 * password nobody knows, so it can only be entered through this route
 * until a password is set elsewhere.
 *
 * Without `GOOGLE_CLIENT_ID` the route answers 503.
 */

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use axum_extra::extract::CookieJar;
use uuid::Uuid;

use crate::backend::auth::federated::FederatedProfile;
use crate::backend::auth::handlers::login::start_session;
use crate::backend::auth::handlers::types::{AuthResponse, GoogleLoginRequest};
use crate::backend::auth::users::{hash_password, NewUser, User, UserStore};
use crate::backend::error::types::INTERNAL_ERROR_MESSAGE;
use crate::backend::error::{BackendError, FederatedError, StoreError};
use crate::backend::server::state::AppState;
use crate::shared::{Role, SharedError};

async fn find_or_create(state: &AppState, profile: FederatedProfile) -> Result<User, BackendError> {
    if let Some(user) = state.users.find_by_email(&profile.email).await? {
        return Ok(user);
    }

    let random_password = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
    let password_hash = hash_password(&random_password, state.bcrypt_cost).map_err(|e| {
        tracing::error!("Failed to hash password: {:?}", e);
        BackendError::handler(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
    })?;

    let email = profile.email.clone();
    let created = state
        .users
        .create(NewUser {
            name: profile.name,
            email: profile.email,
            password_hash,
            role: Role::User,
            avatar: profile.avatar,
        })
        .await;

    match created {
        Ok(user) => {
            tracing::info!("Created account for federated login: {}", user.email);
            Ok(user)
        }
        // A concurrent request created the account first
        Err(StoreError::Conflict(_)) => state
            .users
            .find_by_email(&email)
            .await?
            .ok_or_else(|| BackendError::handler(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)),
        Err(e) => Err(e.into()),
    }
}

/// Federated login handler
///
/// # Errors
///
/// * `400 Bad Request` - If the credential is blank
/// * `403 Forbidden` - If the ID token does not verify or its email is unverified
/// * `503 Service Unavailable` - If no Google client ID is configured
/// * `500 Internal Server Error` - If key fetching, the store or token signing fails
pub async fn google_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<GoogleLoginRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), BackendError> {
    let verifier = state.federated.clone().ok_or(FederatedError::NotConfigured)?;

    let credential = request.credential.trim();
    if credential.is_empty() {
        return Err(SharedError::validation("credential", "Credential is required.").into());
    }

    let profile = verifier.verify(credential).await.map_err(|e| {
        tracing::warn!(reason = %e, "Federated login rejected");
        e
    })?;

    tracing::info!(subject = %profile.subject, "Federated login for: {}", profile.email);

    let user = find_or_create(&state, profile).await?;
    let jar = start_session(&state, jar, &user)?;

    Ok((jar, Json(AuthResponse::new("Login successful.", &user))))
}
