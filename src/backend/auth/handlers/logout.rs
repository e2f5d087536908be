/**
 * Logout Handler
 *
 * GET /api/auth/logout clears the `access_token` cookie. Tokens are
 * stateless, so a copy of the token taken before logout stays valid until
 * it expires.
 */

use axum::{extract::State, response::Json};
use axum_extra::extract::CookieJar;

use crate::backend::auth::handlers::types::MessageResponse;
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;

/// Logout handler
///
/// Requires a verified session (the route sits behind `authenticate`).
pub async fn logout(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    tracing::info!(user_id = %identity.id, "User logged out");
    (state.cookies.clear(jar), Json(MessageResponse::new("Logout successful.")))
}
