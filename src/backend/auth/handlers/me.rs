/**
 * Current Session Handler
 *
 * This module implements the handler for GET /api/auth/me, which returns
 * the identity carried by the caller's session.
 *
 * # Authentication
 *
 * The route sits behind the `authenticate` gate, so the session cookie has
 * already been verified and the decoded identity is attached to the request.
 * No store lookup happens here.
 */

use axum::response::Json;

use crate::backend::auth::sessions::Identity;
use crate::backend::middleware::AuthUser;

/// Current session handler
///
/// # Example Response
///
/// ```json
/// {
///   "id": "123e4567-e89b-12d3-a456-426614174000",
///   "role": "user"
/// }
/// ```
pub async fn get_me(AuthUser(identity): AuthUser) -> Json<Identity> {
    tracing::debug!(user_id = %identity.id, "Session identity requested");
    Json(identity)
}
