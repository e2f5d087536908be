/**
 * API Route Table
 *
 * Binds every API path to its handler and chooses the gate that runs in
 * front of it.
 *
 * # Routes
 *
 * ## Authentication (`/api/auth`)
 * - `POST /register` - no gate
 * - `POST /login` - no gate
 * - `POST /google-login` - no gate
 * - `GET /logout` - `authenticate`
 * - `GET /me` - `authenticate`
 * - `POST /add-admin` - `only_admin`
 *
 * ## Likes (`/api/blog-like`)
 * - `POST /do-like` - `authenticate`
 * - `GET /get-like/{blogid}` - no gate
 * - `GET /get-like/{blogid}/{userid}` - no gate
 *
 * Gates are attached with `route_layer`, so they only run for requests that
 * matched a route. Unknown paths fall through to the 404 fallback instead of
 * being answered with 403.
 */

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};

use crate::backend::auth::handlers::{add_admin, get_me, google_login, login, logout, register};
use crate::backend::likes::handlers::{do_like, get_like, get_like_for_user};
use crate::backend::middleware::{authenticate, only_admin};
use crate::backend::server::state::AppState;

/// Routes nested under `/api/auth`
pub fn auth_routes(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/google-login", post(google_login));

    let session = Router::new()
        .route("/logout", get(logout))
        .route("/me", get(get_me))
        .route_layer(from_fn_with_state(state.clone(), authenticate));

    let admin = Router::new()
        .route("/add-admin", post(add_admin))
        .route_layer(from_fn_with_state(state.clone(), only_admin));

    public.merge(session).merge(admin)
}

/// Routes nested under `/api/blog-like`
pub fn like_routes(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/get-like/{blogid}", get(get_like))
        .route("/get-like/{blogid}/{userid}", get(get_like_for_user));

    let session = Router::new()
        .route("/do-like", post(do_like))
        .route_layer(from_fn_with_state(state.clone(), authenticate));

    public.merge(session)
}

/// Configure API routes
pub fn configure_api_routes(router: Router<AppState>, state: &AppState) -> Router<AppState> {
    router
        .nest("/api/auth", auth_routes(state))
        .nest("/api/blog-like", like_routes(state))
}
