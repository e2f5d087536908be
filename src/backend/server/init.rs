/**
 * Server Initialization
 *
 * This module builds the application from a validated `ServerConfig`:
 *
 * 1. Connect to Postgres and run migrations if `DATABASE_URL` is set
 * 2. Pick the Postgres stores, or in-memory stores when no database is
 *    available
 * 3. Build `AppState` (token issuer, cookie settings, stores, Google
 *    verifier)
 * 4. Promote or create the `ADMIN_EMAIL` account
 * 5. Create the router
 *
 * A missing database is not fatal; a bad signing secret or CORS origin is.
 */

use std::sync::Arc;

use axum::Router;

use crate::backend::auth::users::{hash_password, MemoryUserStore, NewUser, PgUserStore, User, UserStore};
use crate::backend::error::StartupError;
use crate::backend::likes::store::{LikeStore, MemoryLikeStore, PgLikeStore};
use crate::backend::routes::router::create_router;
use crate::backend::server::config::{load_database, ServerConfig};
use crate::backend::server::state::AppState;
use crate::shared::Role;

/// Make sure `email` belongs to an administrator
///
/// An existing account is promoted. A missing one is created with
/// `password` when given; without a password nothing is created and
/// `None` is returned.
pub async fn seed_admin(
    state: &AppState,
    email: &str,
    password: Option<&str>,
) -> Result<Option<User>, StartupError> {
    if let Some(user) = state.users.set_role(email, Role::Admin).await? {
        tracing::info!("Existing account promoted to admin: {}", user.email);
        return Ok(Some(user));
    }

    let Some(password) = password else {
        tracing::warn!(
            "ADMIN_EMAIL {} has no account and ADMIN_PASSWORD is not set. No admin seeded.",
            email
        );
        return Ok(None);
    };

    let name = email.split('@').next().unwrap_or_default().trim().to_string();
    let user = state
        .users
        .create(NewUser {
            name,
            email: email.to_string(),
            password_hash: hash_password(password, state.bcrypt_cost)?,
            role: Role::Admin,
            avatar: None,
        })
        .await?;

    tracing::info!("Admin account created: {}", user.email);
    Ok(Some(user))
}

/// Create and configure the Axum application
///
/// # Errors
///
/// Returns a `StartupError` if the configuration is unusable or the admin
/// account cannot be seeded. Nothing is served in that case.
pub async fn create_app(config: &ServerConfig) -> Result<Router<()>, StartupError> {
    tracing::info!("Initializing blogpress backend server");

    config.validate()?;

    let db_pool = load_database(config.database_url.as_deref()).await;

    let (users, likes): (Arc<dyn UserStore>, Arc<dyn LikeStore>) = match db_pool {
        Some(pool) => {
            tracing::info!("Using Postgres stores");
            (
                Arc::new(PgUserStore::new(pool.clone())),
                Arc::new(PgLikeStore::new(pool)),
            )
        }
        None => {
            tracing::info!("Using in-memory stores");
            (Arc::new(MemoryUserStore::new()), Arc::new(MemoryLikeStore::new()))
        }
    };

    let app_state = AppState::new(config, users, likes)?;
    if app_state.federated.is_none() {
        tracing::info!("GOOGLE_CLIENT_ID not set. Federated login disabled.");
    }

    if let Some(email) = config.admin_email.as_deref() {
        seed_admin(&app_state, email, config.admin_password.as_deref()).await?;
    }

    let app = create_router(app_state, config)?;

    tracing::info!("Router configured");

    Ok(app)
}
