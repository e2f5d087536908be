//! Common test utilities and helpers
//!
//! Builds the full router over in-memory stores with a fixture secret and
//! wraps it in an `axum_test::TestServer`. Cookies are passed explicitly so
//! every test states which session it is using.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum_test::{TestResponse, TestServer};
use cookie::Cookie;
use jsonwebtoken::{encode, Algorithm, DecodingKey, EncodingKey, Header};
use serde_json::{json, Value};

use blogpress::backend::auth::federated::{IdTokenClaims, IdTokenVerifier, StaticKeySource};
use blogpress::backend::auth::sessions::TokenIssuer;
use blogpress::backend::routes::create_router;
use blogpress::backend::server::config::SESSION_COOKIE_NAME;
use blogpress::backend::server::{seed_admin, AppState, ServerConfig};

/// Signing secret used by every test app
pub const TEST_SECRET: &str = "integration-test-secret";

/// Token lifetime used by every test app
pub const TEST_TTL: Duration = Duration::from_secs(3600);

/// OAuth client ID the federated test app accepts
pub const GOOGLE_CLIENT_ID: &str = "blogpress-it.apps.googleusercontent.com";

/// Key standing in for Google's signing key in the federated test app
pub const GOOGLE_SIGNING_KEY: &[u8] = b"integration-google-key";

/// A running test app plus handles on its state
pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    pub config: ServerConfig,
}

pub fn test_config() -> ServerConfig {
    ServerConfig::builder()
        .jwt_secret(TEST_SECRET)
        .token_ttl(TEST_TTL)
        .bcrypt_cost(4)
        .build()
        .expect("test config is valid")
}

pub fn spawn_app() -> TestApp {
    spawn_app_with(test_config())
}

pub fn spawn_app_with(config: ServerConfig) -> TestApp {
    let state = AppState::in_memory(&config).expect("state builds");
    serve(state, config)
}

/// Test app whose google-login accepts ID tokens signed with
/// `GOOGLE_SIGNING_KEY` for `GOOGLE_CLIENT_ID`
pub fn spawn_federated_app() -> TestApp {
    let config = test_config();
    let verifier = IdTokenVerifier::new(
        Arc::new(StaticKeySource::new(DecodingKey::from_secret(GOOGLE_SIGNING_KEY))),
        Algorithm::HS256,
        GOOGLE_CLIENT_ID,
    );
    let state = AppState::in_memory(&config)
        .expect("state builds")
        .with_federated(verifier);
    serve(state, config)
}

fn serve(state: AppState, config: ServerConfig) -> TestApp {
    let router = create_router(state.clone(), &config).expect("router builds");
    let server = TestServer::new(router).expect("test server starts");

    TestApp { server, state, config }
}

/// Claims of a valid Google ID token for `email`
pub fn google_claims(email: &str) -> IdTokenClaims {
    IdTokenClaims {
        iss: "https://accounts.google.com".to_string(),
        aud: GOOGLE_CLIENT_ID.to_string(),
        sub: format!("google-{}", email),
        exp: chrono::Utc::now().timestamp() as u64 + 3600,
        email: email.to_string(),
        email_verified: true,
        name: Some("Grace Hopper".to_string()),
        picture: Some("https://example.com/grace.png".to_string()),
    }
}

/// Sign ID token claims with `key`
pub fn google_credential(claims: &IdTokenClaims, key: &[u8]) -> String {
    encode(&Header::new(Algorithm::HS256), claims, &EncodingKey::from_secret(key))
        .expect("credential signs")
}

impl TestApp {
    /// Register an account and return the session cookie and the user JSON
    pub async fn register(&self, name: &str, email: &str, password: &str) -> (Cookie<'static>, Value) {
        let response = self
            .server
            .post("/api/auth/register")
            .json(&json!({ "name": name, "email": email, "password": password }))
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        (response.cookie(SESSION_COOKIE_NAME), body["user"].clone())
    }

    /// Log in and return the session cookie
    pub async fn login(&self, email: &str, password: &str) -> Cookie<'static> {
        let response = self
            .server
            .post("/api/auth/login")
            .json(&json!({ "email": email, "password": password }))
            .await;
        response.assert_status_ok();
        response.cookie(SESSION_COOKIE_NAME)
    }

    /// Seed an admin account the way startup does and log in as it
    pub async fn admin_session(&self, email: &str) -> Cookie<'static> {
        seed_admin(&self.state, email, Some("admin-password"))
            .await
            .expect("store works")
            .expect("admin seeded");
        self.login(email, "admin-password").await
    }
}

/// Cookie carrying an arbitrary token value
pub fn session_cookie(token: impl Into<String>) -> Cookie<'static> {
    Cookie::new(SESSION_COOKIE_NAME, token.into())
}

/// Issuer with the test secret, for forging tokens
pub fn test_issuer() -> TokenIssuer {
    TokenIssuer::new(TEST_SECRET, TEST_TTL).expect("issuer builds")
}

/// Assert the uniform auth failure: 403 with the shared error body
pub fn assert_unauthorized(response: &TestResponse) {
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    let body: Value = response.json();
    assert_eq!(
        body,
        json!({ "success": false, "statusCode": 403, "message": "Unauthorized" })
    );
}
