/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the necessary `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * The `AppState` struct serves as the central state container for the
 * application, holding:
 * - The token issuer (signing keys derived from the configured secret)
 * - Session cookie settings
 * - The credential store and the like store
 * - The bcrypt cost for new password hashes
 * - The Google ID token verifier, when federated login is configured
 *
 * # Thread Safety
 *
 * Everything in `AppState` is either immutable after startup (`TokenIssuer`,
 * `CookieSettings`) or a thread-safe store behind `Arc<dyn ...>`. Cloning the
 * state is cheap and requests never coordinate with each other.
 *
 * # State Extraction
 *
 * The `FromRef` implementations allow Axum handlers to extract specific
 * parts of the state without needing the entire `AppState`.
 */

use std::sync::Arc;

use axum::extract::FromRef;

use crate::backend::auth::cookie::CookieSettings;
use crate::backend::auth::federated::IdTokenVerifier;
use crate::backend::auth::sessions::TokenIssuer;
use crate::backend::auth::users::{MemoryUserStore, UserStore};
use crate::backend::likes::store::{LikeStore, MemoryLikeStore};
use crate::backend::error::StartupError;
use crate::backend::server::config::ServerConfig;

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    /// Issues and verifies session tokens
    pub tokens: Arc<TokenIssuer>,
    /// Session cookie attributes
    pub cookies: CookieSettings,
    /// Credential store
    pub users: Arc<dyn UserStore>,
    /// Blog like store
    pub likes: Arc<dyn LikeStore>,
    /// bcrypt cost for new password hashes
    pub bcrypt_cost: u32,
    /// Google ID token verifier; `None` disables google-login
    pub federated: Option<Arc<IdTokenVerifier>>,
}

impl AppState {
    /// Build the state from configuration and stores
    ///
    /// # Errors
    ///
    /// Returns a `StartupError` if the signing secret is unusable or the
    /// Google verifier cannot be built.
    pub fn new(
        config: &ServerConfig,
        users: Arc<dyn UserStore>,
        likes: Arc<dyn LikeStore>,
    ) -> Result<Self, StartupError> {
        let federated = match config.google_client_id.as_deref() {
            Some(client_id) => Some(Arc::new(IdTokenVerifier::google(client_id)?)),
            None => None,
        };

        Ok(Self {
            tokens: Arc::new(TokenIssuer::from_config(config)?),
            cookies: CookieSettings::from_config(config),
            users,
            likes,
            bcrypt_cost: config.bcrypt_cost,
            federated,
        })
    }

    /// Replace the Google ID token verifier
    pub fn with_federated(mut self, verifier: IdTokenVerifier) -> Self {
        self.federated = Some(Arc::new(verifier));
        self
    }

    /// State backed by in-memory stores
    pub fn in_memory(config: &ServerConfig) -> Result<Self, StartupError> {
        Self::new(
            config,
            Arc::new(MemoryUserStore::new()),
            Arc::new(MemoryLikeStore::new()),
        )
    }

    /// In-memory state with a fixed secret and the cheapest bcrypt cost
    #[cfg(test)]
    pub(crate) fn for_tests() -> Self {
        let config = ServerConfig::builder()
            .jwt_secret("test-secret-key")
            .bcrypt_cost(4)
            .build()
            .expect("test config is valid");
        Self::in_memory(&config).expect("test state builds")
    }
}

impl FromRef<AppState> for Arc<TokenIssuer> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.tokens.clone()
    }
}

impl FromRef<AppState> for CookieSettings {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.cookies
    }
}

impl FromRef<AppState> for Arc<dyn UserStore> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.users.clone()
    }
}

impl FromRef<AppState> for Arc<dyn LikeStore> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.likes.clone()
    }
}
