//! Google ID token verification
//!
//! `POST /api/auth/google-login` receives the ID token (`credential`) that
//! Google sign-in hands to the browser. Nothing in it is trusted until the
//! signature checks out against Google's published keys and the standard
//! claims match: `aud` is our OAuth client ID, `iss` is Google, `exp` lies
//! in the future. The email must also be marked verified by Google.
//!
//! Signing keys come from a [`KeySource`]. [`GoogleJwks`] fetches Google's
//! JWKS document and caches it; [`StaticKeySource`] serves one fixed key.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::backend::error::FederatedError;

/// Values Google puts in the `iss` claim
pub const GOOGLE_ISSUERS: [&str; 2] = ["accounts.google.com", "https://accounts.google.com"];

/// Google's published ID token signing keys
pub const GOOGLE_JWKS_URL: &str = "https://www.googleapis.com/oauth2/v3/certs";

/// How long a fetched key set is used before it is fetched again
const KEY_CACHE_TTL: Duration = Duration::from_secs(60 * 60);

/// Unknown key IDs only trigger a refetch once the cache is this old
const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(5 * 60);

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Claims read from a Google ID token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdTokenClaims {
    pub iss: String,
    pub aud: String,
    /// Google account ID
    pub sub: String,
    pub exp: u64,
    pub email: String,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Profile picture URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
}

/// Profile taken from a verified ID token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FederatedProfile {
    pub subject: String,
    pub email: String,
    pub name: String,
    pub avatar: Option<String>,
}

impl From<IdTokenClaims> for FederatedProfile {
    fn from(claims: IdTokenClaims) -> Self {
        // Fall back to the local part of the email when the token has no name
        let name = claims
            .name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| claims.email.split('@').next().unwrap_or_default().to_string());

        Self {
            subject: claims.sub,
            email: claims.email,
            name,
            avatar: claims.picture.filter(|url| !url.trim().is_empty()),
        }
    }
}

/// Supplies the key that should verify a token with the given `kid`
#[async_trait]
pub trait KeySource: Send + Sync {
    async fn key_for(&self, kid: Option<&str>) -> Result<DecodingKey, FederatedError>;
}

/// A single fixed verification key, whatever the `kid`
#[derive(Clone)]
pub struct StaticKeySource {
    key: DecodingKey,
}

impl StaticKeySource {
    pub fn new(key: DecodingKey) -> Self {
        Self { key }
    }
}

#[async_trait]
impl KeySource for StaticKeySource {
    async fn key_for(&self, _kid: Option<&str>) -> Result<DecodingKey, FederatedError> {
        Ok(self.key.clone())
    }
}

struct CachedKeys {
    keys: JwkSet,
    fetched_at: Instant,
}

fn find_key(keys: &JwkSet, kid: &str) -> Result<Option<DecodingKey>, FederatedError> {
    Ok(keys.find(kid).map(DecodingKey::from_jwk).transpose()?)
}

/// Google's JWKS endpoint with an in-memory cache
///
/// The key set is fetched on first use and again after `KEY_CACHE_TTL`.
/// A token naming an unknown `kid` forces a refetch,
/// but at most once per `MIN_REFRESH_INTERVAL`.
pub struct GoogleJwks {
    client: reqwest::Client,
    url: String,
    cache: RwLock<Option<CachedKeys>>,
}

impl GoogleJwks {
    /// Key source for the JWKS document at `url`
    ///
    /// # Errors
    ///
    /// `FederatedError::KeyFetch` if the HTTP client cannot be built.
    pub fn new(url: impl Into<String>) -> Result<Self, FederatedError> {
        let client = reqwest::Client::builder().timeout(FETCH_TIMEOUT).build()?;
        Ok(Self {
            client,
            url: url.into(),
            cache: RwLock::new(None),
        })
    }

    async fn refresh(&self) -> Result<(), FederatedError> {
        tracing::debug!(url = %self.url, "Fetching identity provider signing keys");

        let keys = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json::<JwkSet>()
            .await?;

        tracing::info!(count = keys.keys.len(), "Identity provider signing keys refreshed");
        *self.cache.write().await = Some(CachedKeys {
            keys,
            fetched_at: Instant::now(),
        });
        Ok(())
    }

    #[cfg(test)]
    fn with_cached_keys(keys: JwkSet) -> Self {
        let source = Self::new("http://127.0.0.1:9/certs").expect("client builds");
        Self {
            cache: RwLock::new(Some(CachedKeys {
                keys,
                fetched_at: Instant::now(),
            })),
            ..source
        }
    }
}

#[async_trait]
impl KeySource for GoogleJwks {
    async fn key_for(&self, kid: Option<&str>) -> Result<DecodingKey, FederatedError> {
        let kid = kid.ok_or(FederatedError::UnknownKey(None))?;
        let unknown = || FederatedError::UnknownKey(Some(kid.to_string()));

        if let Some(cached) = self.cache.read().await.as_ref() {
            let age = cached.fetched_at.elapsed();
            if age < KEY_CACHE_TTL {
                if let Some(key) = find_key(&cached.keys, kid)? {
                    return Ok(key);
                }
                if age < MIN_REFRESH_INTERVAL {
                    return Err(unknown());
                }
            }
        }

        self.refresh().await?;

        let cache = self.cache.read().await;
        let found = cache.as_ref().map(|cached| find_key(&cached.keys, kid)).transpose()?;
        found.flatten().ok_or_else(unknown)
    }
}

/// Verifies ID tokens issued by Google for one OAuth client
pub struct IdTokenVerifier {
    keys: Arc<dyn KeySource>,
    validation: Validation,
}

impl IdTokenVerifier {
    /// Verifier accepting `algorithm` tokens whose `aud` is `client_id`
    pub fn new(keys: Arc<dyn KeySource>, algorithm: Algorithm, client_id: &str) -> Self {
        let mut validation = Validation::new(algorithm);
        validation.set_audience(&[client_id]);
        validation.set_issuer(&GOOGLE_ISSUERS);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);

        Self { keys, validation }
    }

    /// RS256 verifier backed by Google's published keys
    pub fn google(client_id: &str) -> Result<Self, FederatedError> {
        let keys = GoogleJwks::new(GOOGLE_JWKS_URL)?;
        Ok(Self::new(Arc::new(keys), Algorithm::RS256, client_id))
    }

    /// Check `credential` and return the profile it vouches for
    ///
    /// # Errors
    ///
    /// * `InvalidToken` - bad signature, wrong algorithm, audience or issuer,
    ///   expired or malformed
    /// * `UnknownKey` - the `kid` is not among the provider's keys
    /// * `UnverifiedEmail` - Google has not verified the email
    /// * `KeyFetch` - the provider's keys could not be fetched
    pub async fn verify(&self, credential: &str) -> Result<FederatedProfile, FederatedError> {
        let header = decode_header(credential)?;
        let key = self.keys.key_for(header.kid.as_deref()).await?;
        let claims = decode::<IdTokenClaims>(credential, &key, &self.validation)?.claims;

        if !claims.email_verified {
            return Err(FederatedError::UnverifiedEmail);
        }

        Ok(claims.into())
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_verify_valid_token() {
        let token = sign(&claims_for("grace@example.com"), None, SIGNING_KEY);

        let profile = verifier().verify(&token).await.unwrap();
        assert_eq!(
            profile,
            FederatedProfile {
                subject: "108923451234".to_string(),
                email: "grace@example.com".to_string(),
                name: "Grace Hopper".to_string(),
                avatar: Some("https://example.com/grace.png".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn test_rejects_foreign_signature() {
        let token = sign(&claims_for("grace@example.com"), None, b"someone-elses-key");
        assert_matches!(verifier().verify(&token).await, Err(FederatedError::InvalidToken(_)));
    }

    #[tokio::test]
    async fn test_rejects_other_audience() {
        let mut claims = claims_for("grace@example.com");
        claims.aud = "another-app.apps.googleusercontent.com".to_string();
        let token = sign(&claims, None, SIGNING_KEY);

        assert_matches!(verifier().verify(&token).await, Err(FederatedError::InvalidToken(_)));
    }

    #[tokio::test]
    async fn test_rejects_other_issuer() {
        let mut claims = claims_for("grace@example.com");
        claims.iss = "https://evil.example.com".to_string();
        let token = sign(&claims, None, SIGNING_KEY);

        assert_matches!(verifier().verify(&token).await, Err(FederatedError::InvalidToken(_)));
    }

    #[tokio::test]
    async fn test_rejects_expired_token() {
        let mut claims = claims_for("grace@example.com");
        claims.exp = 1_000;
        let token = sign(&claims, None, SIGNING_KEY);

        assert_matches!(verifier().verify(&token).await, Err(FederatedError::InvalidToken(_)));
    }

    #[tokio::test]
    async fn test_rejects_unverified_email() {
        let mut claims = claims_for("grace@example.com");
        claims.email_verified = false;
        let token = sign(&claims, None, SIGNING_KEY);

        assert_matches!(verifier().verify(&token).await, Err(FederatedError::UnverifiedEmail));
    }

    #[tokio::test]
    async fn test_rejects_malformed_token() {
        for token in ["", "garbage", "e30.e30.sig"] {
            assert_matches!(verifier().verify(token).await, Err(FederatedError::InvalidToken(_)));
        }
    }

    #[tokio::test]
    async fn test_rejects_algorithm_other_than_configured() {
        let rs256_only = IdTokenVerifier::new(
            Arc::new(StaticKeySource::new(DecodingKey::from_secret(SIGNING_KEY))),
            Algorithm::RS256,
            CLIENT_ID,
        );
        let token = sign(&claims_for("grace@example.com"), None, SIGNING_KEY);

        assert_matches!(rs256_only.verify(&token).await, Err(FederatedError::InvalidToken(_)));
    }

    #[test]
    fn test_profile_name_falls_back_to_email() {
        let mut claims = claims_for("grace@example.com");
        claims.name = Some("  ".to_string());
        claims.picture = None;

        let profile = FederatedProfile::from(claims);
        assert_eq!(profile.name, "grace");
        assert_eq!(profile.avatar, None);
    }

    fn cached_jwks() -> GoogleJwks {
        let keys: JwkSet = serde_json::from_value(serde_json::json!({
            "keys": [{
                "kty": "oct",
                "kid": "key-2025",
                "alg": "HS256",
                "k": "Z29vZ2xlLXNpZ25pbmcta2V5LTAx"
            }]
        }))
        .unwrap();
        GoogleJwks::with_cached_keys(keys)
    }

    #[tokio::test]
    async fn test_jwks_selects_key_by_kid() {
        let verifier = IdTokenVerifier::new(Arc::new(cached_jwks()), Algorithm::HS256, CLIENT_ID);
        let token = sign(&claims_for("grace@example.com"), Some("key-2025"), SIGNING_KEY);

        let profile = verifier.verify(&token).await.unwrap();
        assert_eq!(profile.email, "grace@example.com");
    }

    #[tokio::test]
    async fn test_jwks_unknown_kid_in_fresh_cache() {
        let jwks = cached_jwks();

        assert_matches!(
            jwks.key_for(Some("rotated-away")).await.err(),
            Some(FederatedError::UnknownKey(Some(kid))) if kid == "rotated-away"
        );
        assert_matches!(jwks.key_for(None).await.err(), Some(FederatedError::UnknownKey(None)));
    }
}
