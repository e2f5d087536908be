/**
 * Router Configuration
 *
 * This module provides the main router creation function that combines
 * the API routes with the HTTP layers shared by every request.
 *
 * # Layers
 *
 * 1. `TraceLayer` - one span per request
 * 2. `CorsLayer` - a single configured origin with credentials, so the
 *    browser sends the session cookie on cross-origin calls
 * 3. Fallback - unknown paths get the uniform 404 error body
 */

use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::backend::error::BackendError;
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::server::config::{ConfigError, ServerConfig};
use crate::backend::server::state::AppState;

/// Credentialed CORS for one origin
///
/// Credentialed CORS cannot use wildcards, so methods and headers are listed.
pub fn cors_layer(origin: &str) -> Result<CorsLayer, ConfigError> {
    let origin = HeaderValue::from_str(origin).map_err(|_| ConfigError::InvalidValue {
        key: "CORS_ORIGIN",
        value: origin.to_string(),
    })?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, ACCEPT, AUTHORIZATION]))
}

async fn fallback() -> BackendError {
    BackendError::not_found("Route not found.")
}

/// Create the Axum router with all routes configured
///
/// # Errors
///
/// Returns a `ConfigError` if the CORS origin is not a valid header value.
pub fn create_router(app_state: AppState, config: &ServerConfig) -> Result<Router<()>, ConfigError> {
    let cors = cors_layer(&config.cors_origin)?;

    let router = configure_api_routes(Router::new(), &app_state)
        .fallback(fallback)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        );

    Ok(router.with_state(app_state))
}
