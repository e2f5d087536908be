/**
 * Admin Promotion Handler
 *
 * POST /api/auth/add-admin promotes an existing account to the
 * administrator role. The route sits behind `only_admin`.
 *
 * The promoted user's current token still carries the old role; the new
 * role applies from their next login.
 */

use axum::{extract::State, response::Json};

use crate::backend::auth::handlers::types::{AddAdminRequest, AuthResponse};
use crate::backend::auth::users::UserStore;
use crate::backend::error::BackendError;
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::shared::Role;

/// Message when the target account does not exist
pub const USER_NOT_FOUND_MESSAGE: &str = "User not found.";

/// Admin promotion handler
///
/// # Errors
///
/// * `404 Not Found` - If no account has this email
/// * `500 Internal Server Error` - If the store fails
pub async fn add_admin(
    State(state): State<AppState>,
    AuthUser(admin): AuthUser,
    Json(request): Json<AddAdminRequest>,
) -> Result<Json<AuthResponse>, BackendError> {
    let user = state
        .users
        .set_role(&request.email, Role::Admin)
        .await?
        .ok_or_else(|| {
            tracing::warn!("Promotion target not found: {}", request.email);
            BackendError::not_found(USER_NOT_FOUND_MESSAGE)
        })?;

    tracing::info!(admin_id = %admin.id, "Promoted {} to admin", user.email);

    Ok(Json(AuthResponse::new("Admin added successfully.", &user)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use crate::backend::auth::sessions::Identity;
    use crate::backend::auth::users::NewUser;

    fn admin() -> AuthUser {
        AuthUser(Identity {
            id: "admin-1".to_string(),
            role: Role::Admin,
        })
    }

    fn request(email: &str) -> Json<AddAdminRequest> {
        Json(AddAdminRequest {
            email: email.to_string(),
        })
    }

    #[tokio::test]
    async fn test_add_admin_promotes_user() {
        let state = AppState::for_tests();
        state
            .users
            .create(NewUser {
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                password_hash: "hash".to_string(),
                role: Role::User,
                avatar: None,
            })
            .await
            .unwrap();

        let Json(response) = add_admin(State(state.clone()), admin(), request("ada@example.com"))
            .await
            .unwrap();

        assert_eq!(response.user.role, Role::Admin);
        let stored = state.users.find_by_email("ada@example.com").await.unwrap().unwrap();
        assert_eq!(stored.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_add_admin_unknown_user() {
        let error = add_admin(State(AppState::for_tests()), admin(), request("ghost@example.com"))
            .await
            .unwrap_err();

        assert_eq!(error.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(error.message(), USER_NOT_FOUND_MESSAGE);
    }
}
