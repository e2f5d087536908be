/**
 * Session Tokens
 *
 * This module issues and verifies the signed session tokens (HS256 JWTs)
 * carried in the `access_token` cookie.
 *
 * The signing secret comes from `ServerConfig` and is turned into keys once
 * at startup; `TokenIssuer` is then shared read-only by every request.
 * Verification is pure computation and never touches a store.
 */

use std::fmt;
use std::time::Duration;

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::backend::error::{AuthError, TokenError};
use crate::backend::server::config::{ConfigError, ServerConfig};
use crate::shared::Role;

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// Account role at the time the token was issued
    pub role: Role,
    /// Issued at time (Unix timestamp)
    pub iat: u64,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
}

/// Identity decoded from a valid session token
///
/// Attached to the request by the auth middleware and read by handlers.
/// It lives for one request and is never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// User ID
    pub id: String,
    /// Account role
    pub role: Role,
}

impl Identity {
    /// Returns `true` if the identity carries `role`
    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            role: claims.role,
        }
    }
}

/// Issues and verifies session tokens with a server-held secret
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("algorithm", &Algorithm::HS256)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    /// Create an issuer for `secret`
    ///
    /// # Errors
    ///
    /// `ConfigError::MissingValue` if the secret is empty. This is a startup
    /// error, not a per-request one.
    pub fn new(secret: &str, ttl: Duration) -> Result<Self, ConfigError> {
        if secret.trim().is_empty() {
            return Err(ConfigError::MissingValue("JWT_SECRET"));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        })
    }

    /// Create an issuer from the server configuration
    pub fn from_config(config: &ServerConfig) -> Result<Self, ConfigError> {
        Self::new(&config.jwt_secret, config.token_ttl)
    }

    /// Token lifetime
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Create a token for a user, issued now
    pub fn issue(&self, user_id: &str, role: Role) -> Result<String, TokenError> {
        self.issue_at(user_id, role, unix_now())
    }

    /// Create a token for a user with an explicit issue time
    ///
    /// The output depends only on the secret, the claims and `issued_at`.
    pub fn issue_at(&self, user_id: &str, role: Role, issued_at: u64) -> Result<String, TokenError> {
        let claims = Claims {
            sub: user_id.to_string(),
            role,
            iat: issued_at,
            exp: issued_at.saturating_add(self.ttl.as_secs()),
        };

        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }

    /// Verify signature and expiry and decode the claims
    ///
    /// Every failure collapses into `AuthError::InvalidToken`; the reason is
    /// logged at debug level only.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(reason = ?e.kind(), "Session token rejected");
                AuthError::InvalidToken
            })
    }
}

fn unix_now() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp()).unwrap_or_default()
}
