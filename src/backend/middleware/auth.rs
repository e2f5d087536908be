/**
 * Authentication Middleware
 *
 * This module provides middleware for protecting routes that require a
 * logged-in user. It reads the session token from the `access_token`
 * cookie, verifies it and attaches the decoded `Identity` to the request
 * extensions for handlers.
 *
 * Verification happens in exactly one function, `verify_session`. Both
 * gates (`authenticate` here and `only_admin` in the admin module) run it
 * and differ only in the role predicate applied afterwards.
 */

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;

use crate::backend::auth::cookie::session_token;
use crate::backend::auth::sessions::{Identity, TokenIssuer};
use crate::backend::error::{AuthError, BackendError};
use crate::backend::server::state::AppState;

/// Verify the session carried by `headers`
///
/// 1. Missing or empty `access_token` cookie → `MissingCredential`
/// 2. Bad signature, malformed or expired token → `InvalidToken`
/// 3. Otherwise the decoded identity
pub fn verify_session(tokens: &TokenIssuer, headers: &HeaderMap) -> Result<Identity, AuthError> {
    let jar = CookieJar::from_headers(headers);
    let token = session_token(&jar).ok_or(AuthError::MissingCredential)?;
    let claims = tokens.verify(&token)?;
    Ok(Identity::from(claims))
}

/// Verify the session, apply `predicate` and hand the request on
///
/// Shared by every gate so the checks cannot drift apart.
pub(crate) async fn gate<P>(
    state: &AppState,
    mut request: Request,
    next: Next,
    predicate: P,
) -> Result<Response, BackendError>
where
    P: FnOnce(Identity) -> Result<Identity, AuthError>,
{
    let identity = verify_session(&state.tokens, request.headers())
        .and_then(predicate)
        .map_err(|reason| {
            tracing::warn!(
                %reason,
                method = %request.method(),
                path = %request.uri().path(),
                "Request rejected by session gate"
            );
            reason
        })?;

    tracing::debug!(user_id = %identity.id, role = %identity.role, "Session verified");
    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

/// Authentication middleware
///
/// Admits any valid session regardless of role. Use with
/// `axum::middleware::from_fn_with_state`.
pub async fn authenticate(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, BackendError> {
    gate(&state, request, next, |identity| Ok(identity)).await
}

/// Axum extractor for the authenticated identity
///
/// Only meaningful behind `authenticate` or `only_admin`; on an ungated
/// route it rejects with the uniform 403.
#[derive(Clone, Debug)]
pub struct AuthUser(pub Identity);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let identity = parts
            .extensions
            .get::<Identity>()
            .cloned()
            .ok_or_else(|| {
                tracing::warn!("Identity not found in request extensions");
                BackendError::from(AuthError::MissingCredential)
            })?;

        Ok(AuthUser(identity))
    }
}
