/**
 * Authorization Middleware (role gate)
 *
 * `only_admin` runs the same session verification as `authenticate` and
 * then requires the administrator role. A valid session with the wrong
 * role is rejected with exactly the same response as a missing cookie.
 */

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::backend::auth::sessions::Identity;
use crate::backend::error::{AuthError, BackendError};
use crate::backend::middleware::auth::gate;
use crate::backend::server::state::AppState;
use crate::shared::Role;

/// Role predicate applied after session verification
pub fn require_role(role: Role) -> impl FnOnce(Identity) -> Result<Identity, AuthError> {
    move |identity| {
        if identity.has_role(role) {
            Ok(identity)
        } else {
            tracing::debug!(
                user_id = %identity.id,
                role = %identity.role,
                required = %role,
                "Role gate denied access"
            );
            Err(AuthError::InsufficientRole)
        }
    }
}

/// Admin-only middleware
///
/// Use with `axum::middleware::from_fn_with_state`.
pub async fn only_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, BackendError> {
    gate(&state, request, next, require_role(Role::Admin)).await
}
