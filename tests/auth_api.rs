//! Authentication API integration tests
//!
//! Tests for registration, login, federated login, logout and the session
//! cookie they exchange.

#![cfg(feature = "ssr")]

mod common;

use axum::http::{header, HeaderValue, StatusCode};
use cookie::SameSite;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use blogpress::backend::auth::users::UserStore;
use blogpress::backend::server::config::SESSION_COOKIE_NAME;
use blogpress::backend::server::ServerConfig;
use common::{
    assert_unauthorized, google_claims, google_credential, spawn_app, spawn_app_with,
    spawn_federated_app, GOOGLE_SIGNING_KEY, TEST_SECRET, TEST_TTL,
};

#[tokio::test]
async fn test_register_sets_cookie_and_hides_hash() {
    let app = spawn_app();

    let response = app
        .server
        .post("/api/auth/register")
        .json(&json!({ "name": "Ada", "email": "ada@example.com", "password": "password123" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Registration successful.");
    assert_eq!(body["user"]["email"], "ada@example.com");
    assert_eq!(body["user"]["role"], "user");
    assert!(body["user"].get("password_hash").is_none());
    assert!(body.get("token").is_none());

    let cookie = response.cookie(SESSION_COOKIE_NAME);
    assert!(!cookie.value().is_empty());
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.path(), Some("/"));
    assert_eq!(cookie.same_site(), Some(SameSite::Strict));
    assert_eq!(cookie.secure(), None);
    assert_eq!(
        cookie.max_age(),
        Some(time::Duration::seconds(TEST_TTL.as_secs() as i64))
    );
}

#[tokio::test]
async fn test_secure_cookie_uses_same_site_none() {
    let config = ServerConfig::builder()
        .jwt_secret(TEST_SECRET)
        .cookie_secure(true)
        .bcrypt_cost(4)
        .build()
        .unwrap();
    let app = spawn_app_with(config);

    let (cookie, _) = app.register("Ada", "ada@example.com", "password123").await;

    assert_eq!(cookie.secure(), Some(true));
    assert_eq!(cookie.same_site(), Some(SameSite::None));
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = spawn_app();
    app.register("Ada", "ada@example.com", "password123").await;

    let response = app
        .server
        .post("/api/auth/register")
        .json(&json!({ "name": "Ada", "email": "ADA@example.com", "password": "password123" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(
        body,
        json!({ "success": false, "statusCode": 409, "message": "User already registered." })
    );
}

#[tokio::test]
async fn test_register_rejects_invalid_input() {
    let app = spawn_app();

    let response = app
        .server
        .post("/api/auth/register")
        .json(&json!({ "name": "Ada", "email": "ada@example.com", "password": "short" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["statusCode"], 400);
    assert!(response.maybe_cookie(SESSION_COOKIE_NAME).is_none());
}

#[tokio::test]
async fn test_login_then_gated_route_succeeds() {
    let app = spawn_app();
    let (_, user) = app.register("Ada", "ada@example.com", "password123").await;

    let cookie = app.login("ada@example.com", "password123").await;
    let response = app.server.get("/api/auth/me").add_cookie(cookie).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["id"], user["id"]);
    assert_eq!(body["role"], "user");
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = spawn_app();
    app.register("Ada", "ada@example.com", "password123").await;

    let wrong_password = app
        .server
        .post("/api/auth/login")
        .json(&json!({ "email": "ada@example.com", "password": "wrong-password" }))
        .await;
    let unknown_user = app
        .server
        .post("/api/auth/login")
        .json(&json!({ "email": "nobody@example.com", "password": "password123" }))
        .await;

    assert_eq!(wrong_password.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(unknown_user.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(wrong_password.json::<Value>(), unknown_user.json::<Value>());
    assert_eq!(
        wrong_password.json::<Value>()["message"],
        "Invalid login credentials."
    );
}

#[tokio::test]
async fn test_logout_clears_cookie_and_gate_rejects() {
    let app = spawn_app();
    app.register("Ada", "ada@example.com", "password123").await;
    let cookie = app.login("ada@example.com", "password123").await;

    let response = app.server.get("/api/auth/logout").add_cookie(cookie).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body, json!({ "success": true, "message": "Logout successful." }));

    let cleared = response.cookie(SESSION_COOKIE_NAME);
    assert_eq!(cleared.value(), "");

    // The browser now sends the cleared (empty) cookie
    let after = app.server.get("/api/auth/me").add_cookie(cleared).await;
    assert_unauthorized(&after);
}

#[tokio::test]
async fn test_logout_only_answers_get() {
    let app = spawn_app();
    app.register("Ada", "ada@example.com", "password123").await;
    let cookie = app.login("ada@example.com", "password123").await;

    let post = app
        .server
        .post("/api/auth/logout")
        .add_cookie(cookie.clone())
        .await;
    assert_ne!(post.status_code(), StatusCode::OK);
    assert!(post.maybe_cookie(SESSION_COOKIE_NAME).is_none());

    // The session survived the POST
    let me = app.server.get("/api/auth/me").add_cookie(cookie).await;
    me.assert_status_ok();
}

#[tokio::test]
async fn test_google_login_creates_then_reuses_account() {
    let app = spawn_federated_app();
    let credential = google_credential(&google_claims("grace@example.com"), GOOGLE_SIGNING_KEY);

    let first = app
        .server
        .post("/api/auth/google-login")
        .json(&json!({ "credential": credential }))
        .await;
    first.assert_status_ok();
    let second = app
        .server
        .post("/api/auth/google-login")
        .json(&json!({ "credential": credential }))
        .await;
    second.assert_status_ok();

    let first_body: Value = first.json();
    let second_body: Value = second.json();
    assert_eq!(first_body["user"]["id"], second_body["user"]["id"]);
    assert_eq!(first_body["user"]["name"], "Grace Hopper");
    assert_eq!(first_body["user"]["avatar"], "https://example.com/grace.png");

    let me = app
        .server
        .get("/api/auth/me")
        .add_cookie(second.cookie(SESSION_COOKIE_NAME))
        .await;
    me.assert_status_ok();
}

#[tokio::test]
async fn test_google_login_cannot_impersonate_admin() {
    let app = spawn_federated_app();
    app.admin_session("root@example.com").await;

    // Self-asserted profile without any token
    let unsigned = app
        .server
        .post("/api/auth/google-login")
        .json(&json!({ "name": "Root", "email": "root@example.com" }))
        .await;
    assert_ne!(unsigned.status_code(), StatusCode::OK);
    assert!(unsigned.maybe_cookie(SESSION_COOKIE_NAME).is_none());

    let mut other_audience = google_claims("root@example.com");
    other_audience.aud = "someone-else.apps.googleusercontent.com".to_string();
    let mut unverified = google_claims("root@example.com");
    unverified.email_verified = false;

    let forged = [
        google_credential(&google_claims("root@example.com"), b"attacker-key"),
        google_credential(&other_audience, GOOGLE_SIGNING_KEY),
        google_credential(&unverified, GOOGLE_SIGNING_KEY),
    ];

    for credential in forged {
        let response = app
            .server
            .post("/api/auth/google-login")
            .json(&json!({ "credential": credential }))
            .await;
        assert_unauthorized(&response);
        assert!(response.maybe_cookie(SESSION_COOKIE_NAME).is_none());
    }

    // Still exactly one admin account, untouched
    let stored = app
        .state
        .users
        .find_by_email("root@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.name, "root");
}

#[tokio::test]
async fn test_google_login_disabled_without_client_id() {
    let app = spawn_app();
    let credential = google_credential(&google_claims("grace@example.com"), GOOGLE_SIGNING_KEY);

    let response = app
        .server
        .post("/api/auth/google-login")
        .json(&json!({ "credential": credential }))
        .await;

    assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        response.json::<Value>(),
        json!({ "success": false, "statusCode": 503, "message": "Federated login is not configured." })
    );
    assert!(response.maybe_cookie(SESSION_COOKIE_NAME).is_none());
}

#[tokio::test]
async fn test_cors_allows_configured_origin_with_credentials() {
    let app = spawn_app();

    let response = app
        .server
        .get("/api/blog-like/get-like/b1")
        .add_header(header::ORIGIN, HeaderValue::from_static("http://localhost:5173"))
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.header(header::ACCESS_CONTROL_ALLOW_ORIGIN),
        "http://localhost:5173"
    );
    assert_eq!(
        response.header(header::ACCESS_CONTROL_ALLOW_CREDENTIALS),
        "true"
    );
}
