/**
 * Server Configuration
 *
 * This module handles loading and validation of server configuration and
 * the optional PostgreSQL database connection.
 *
 * # Configuration Sources
 *
 * Configuration is read once at startup from environment variables (a
 * `.env` file is loaded by the binary first), with sensible defaults for
 * local development. The resulting `ServerConfig` is immutable and passed
 * to whatever needs it; nothing reads the environment after boot.
 *
 * # Error Handling
 *
 * A missing or empty `JWT_SECRET` is fatal: the server refuses to start
 * instead of discovering the problem on the first login. A missing or
 * unreachable database is not: the server falls back to in-memory stores.
 *
 * # Optional Features
 *
 * - `GOOGLE_CLIENT_ID` enables `POST /api/auth/google-login`. Without it the
 *   route answers 503.
 * - `ADMIN_EMAIL` (and optionally `ADMIN_PASSWORD`) names the account that
 *   is promoted to admin at startup.
 */

use std::fmt;
use std::time::Duration;

use sqlx::PgPool;
use thiserror::Error;

/// Name of the session cookie
pub const SESSION_COOKIE_NAME: &str = "access_token";

/// Default token lifetime (7 days)
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Default origin allowed to send credentialed requests
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";

/// Default listen port
pub const DEFAULT_PORT: u16 = 3000;

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
}

/// Immutable server configuration
#[derive(Clone)]
pub struct ServerConfig {
    /// HMAC secret used to sign and verify session tokens
    pub jwt_secret: String,
    /// Session token lifetime, also used as the cookie `Max-Age`
    pub token_ttl: Duration,
    /// Port the HTTP server listens on
    pub port: u16,
    /// PostgreSQL URL; `None` selects the in-memory stores
    pub database_url: Option<String>,
    /// Whether the session cookie carries the `Secure` attribute
    pub cookie_secure: bool,
    /// Origin allowed to make credentialed cross-origin requests
    pub cors_origin: String,
    /// bcrypt cost used when hashing passwords
    pub bcrypt_cost: u32,
    /// OAuth client ID that Google ID tokens must be issued for
    pub google_client_id: Option<String>,
    /// Account promoted to admin at startup
    pub admin_email: Option<String>,
    /// Password for the admin account if it has to be created
    pub admin_password: Option<String>,
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .field("port", &self.port)
            .field("database_url", &self.database_url.as_ref().map(|_| "<redacted>"))
            .field("cookie_secure", &self.cookie_secure)
            .field("cors_origin", &self.cors_origin)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("google_client_id", &self.google_client_id)
            .field("admin_email", &self.admin_email)
            .field("admin_password", &self.admin_password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl ServerConfig {
    /// Create a new ServerConfigBuilder
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let mut builder = Self::builder();

        if let Some(secret) = get("JWT_SECRET") {
            builder = builder.jwt_secret(secret);
        }
        if let Some(ttl) = get("TOKEN_TTL_SECS") {
            let secs = parse_number::<u64>("TOKEN_TTL_SECS", &ttl)?;
            builder = builder.token_ttl(Duration::from_secs(secs));
        }
        if let Some(port) = get("PORT").or_else(|| get("SERVER_PORT")) {
            builder = builder.port(parse_number::<u16>("PORT", &port)?);
        }
        if let Some(url) = get("DATABASE_URL") {
            builder = builder.database_url(url);
        }
        if let Some(secure) = get("COOKIE_SECURE") {
            builder = builder.cookie_secure(parse_bool("COOKIE_SECURE", &secure)?);
        }
        if let Some(origin) = get("CORS_ORIGIN") {
            builder = builder.cors_origin(origin);
        }
        if let Some(cost) = get("BCRYPT_COST") {
            builder = builder.bcrypt_cost(parse_number::<u32>("BCRYPT_COST", &cost)?);
        }
        if let Some(client_id) = get("GOOGLE_CLIENT_ID") {
            builder = builder.google_client_id(client_id);
        }
        if let Some(email) = get("ADMIN_EMAIL") {
            builder = builder.admin_email(email);
        }
        if let Some(password) = get("ADMIN_PASSWORD") {
            builder = builder.admin_password(password);
        }

        builder.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.trim().is_empty() {
            return Err(ConfigError::MissingValue("JWT_SECRET"));
        }
        if self.token_ttl.is_zero() {
            return Err(ConfigError::InvalidValue {
                key: "TOKEN_TTL_SECS",
                value: "0".to_string(),
            });
        }
        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(ConfigError::InvalidValue {
                key: "BCRYPT_COST",
                value: self.bcrypt_cost.to_string(),
            });
        }
        if self.admin_password.is_some() && self.admin_email.is_none() {
            return Err(ConfigError::MissingValue("ADMIN_EMAIL"));
        }
        Ok(())
    }
}

/// Builder for ServerConfig
#[derive(Debug)]
pub struct ServerConfigBuilder {
    jwt_secret: Option<String>,
    token_ttl: Duration,
    port: u16,
    database_url: Option<String>,
    cookie_secure: bool,
    cors_origin: String,
    bcrypt_cost: u32,
    google_client_id: Option<String>,
    admin_email: Option<String>,
    admin_password: Option<String>,
}

impl Default for ServerConfigBuilder {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            token_ttl: DEFAULT_TOKEN_TTL,
            port: DEFAULT_PORT,
            database_url: None,
            cookie_secure: false,
            cors_origin: DEFAULT_CORS_ORIGIN.to_string(),
            bcrypt_cost: bcrypt::DEFAULT_COST,
            google_client_id: None,
            admin_email: None,
            admin_password: None,
        }
    }
}

impl ServerConfigBuilder {
    /// Set the token signing secret
    pub fn jwt_secret(mut self, secret: impl Into<String>) -> Self {
        self.jwt_secret = Some(secret.into());
        self
    }

    /// Set the token lifetime
    pub fn token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    /// Set the listen port
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the database URL
    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    /// Set the `Secure` cookie attribute
    pub fn cookie_secure(mut self, secure: bool) -> Self {
        self.cookie_secure = secure;
        self
    }

    /// Set the CORS origin
    pub fn cors_origin(mut self, origin: impl Into<String>) -> Self {
        self.cors_origin = origin.into();
        self
    }

    /// Set the bcrypt cost
    pub fn bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    /// Set the Google OAuth client ID accepted as ID token audience
    pub fn google_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.google_client_id = Some(client_id.into());
        self
    }

    /// Set the account promoted to admin at startup
    pub fn admin_email(mut self, email: impl Into<String>) -> Self {
        self.admin_email = Some(email.into());
        self
    }

    pub fn admin_password(mut self, password: impl Into<String>) -> Self {
        self.admin_password = Some(password.into());
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<ServerConfig, ConfigError> {
        let config = ServerConfig {
            jwt_secret: self.jwt_secret.ok_or(ConfigError::MissingValue("JWT_SECRET"))?,
            token_ttl: self.token_ttl,
            port: self.port,
            database_url: self.database_url,
            cookie_secure: self.cookie_secure,
            cors_origin: self.cors_origin,
            bcrypt_cost: self.bcrypt_cost,
            google_client_id: self.google_client_id,
            admin_email: self.admin_email,
            admin_password: self.admin_password,
        };
        config.validate()?;
        Ok(config)
    }
}

fn parse_number<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse::<T>().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    })
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
        }),
    }
}

/// Load and initialize the database connection pool
///
/// This function:
/// 1. Creates a PostgreSQL connection pool for `database_url`
/// 2. Runs the embedded migrations
///
/// # Returns
///
/// - `Some(PgPool)` if the database is successfully configured
/// - `None` if no URL is configured or the connection fails
///
/// Errors are logged but do not prevent server startup; the caller falls
/// back to in-memory stores.
pub async fn load_database(database_url: Option<&str>) -> Option<PgPool> {
    let Some(database_url) = database_url else {
        tracing::warn!("DATABASE_URL not set. Using in-memory stores.");
        return None;
    };

    tracing::info!("Connecting to database...");

    let pool = match PgPool::connect(database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to create database connection pool: {:?}", e);
            tracing::warn!("Falling back to in-memory stores.");
            return None;
        }
    };

    tracing::info!("Running database migrations...");
    match sqlx::migrate!().run(&pool).await {
        Ok(_) => tracing::info!("Database migrations completed successfully"),
        Err(e) => {
            tracing::error!("Failed to run database migrations: {}", e);
            tracing::warn!("Continuing without migrations - database might not be up to date");
        }
    }

    Some(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_secret_is_fatal() {
        let result = ServerConfig::from_lookup(lookup(&[]));
        assert_eq!(result.unwrap_err(), ConfigError::MissingValue("JWT_SECRET"));
    }

    #[test]
    fn test_blank_secret_is_fatal() {
        let result = ServerConfig::from_lookup(lookup(&[("JWT_SECRET", "   ")]));
        assert_eq!(result.unwrap_err(), ConfigError::MissingValue("JWT_SECRET"));
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[("JWT_SECRET", "s3cret")])).unwrap();
        assert_eq!(config.token_ttl, DEFAULT_TOKEN_TTL);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.cors_origin, DEFAULT_CORS_ORIGIN);
        assert!(config.database_url.is_none());
        assert!(!config.cookie_secure);
        assert_eq!(config.bcrypt_cost, bcrypt::DEFAULT_COST);
        assert!(config.google_client_id.is_none());
        assert!(config.admin_email.is_none());
        assert!(config.admin_password.is_none());
    }

    #[test]
    fn test_admin_seed_and_federated_settings() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("JWT_SECRET", "s3cret"),
            ("GOOGLE_CLIENT_ID", "1234.apps.googleusercontent.com"),
            ("ADMIN_EMAIL", "root@example.com"),
            ("ADMIN_PASSWORD", "bootstrap-password"),
        ]))
        .unwrap();
        assert_eq!(config.google_client_id.as_deref(), Some("1234.apps.googleusercontent.com"));
        assert_eq!(config.admin_email.as_deref(), Some("root@example.com"));
        assert_eq!(config.admin_password.as_deref(), Some("bootstrap-password"));

        let debug = format!("{:?}", config);
        assert!(!debug.contains("bootstrap-password"));
    }

    #[test]
    fn test_admin_password_requires_admin_email() {
        let result = ServerConfig::from_lookup(lookup(&[
            ("JWT_SECRET", "s3cret"),
            ("ADMIN_PASSWORD", "bootstrap-password"),
        ]));
        assert_eq!(result.unwrap_err(), ConfigError::MissingValue("ADMIN_EMAIL"));
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("JWT_SECRET", "s3cret"),
            ("TOKEN_TTL_SECS", "60"),
            ("SERVER_PORT", "8080"),
            ("COOKIE_SECURE", "true"),
            ("BCRYPT_COST", "4"),
            ("DATABASE_URL", "postgres://localhost/blog"),
        ]))
        .unwrap();
        assert_eq!(config.token_ttl, Duration::from_secs(60));
        assert_eq!(config.port, 8080);
        assert!(config.cookie_secure);
        assert_eq!(config.bcrypt_cost, 4);
        assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/blog"));
    }

    #[test]
    fn test_port_takes_precedence_over_server_port() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("JWT_SECRET", "s3cret"),
            ("PORT", "5000"),
            ("SERVER_PORT", "8080"),
        ]))
        .unwrap();
        assert_eq!(config.port, 5000);
    }

    #[test]
    fn test_invalid_values() {
        let result = ServerConfig::from_lookup(lookup(&[
            ("JWT_SECRET", "s3cret"),
            ("PORT", "not-a-port"),
        ]));
        assert_matches!(result, Err(ConfigError::InvalidValue { key: "PORT", .. }));

        let result = ServerConfig::from_lookup(lookup(&[
            ("JWT_SECRET", "s3cret"),
            ("COOKIE_SECURE", "maybe"),
        ]));
        assert_matches!(result, Err(ConfigError::InvalidValue { key: "COOKIE_SECURE", .. }));

        let result = ServerConfig::from_lookup(lookup(&[
            ("JWT_SECRET", "s3cret"),
            ("TOKEN_TTL_SECS", "0"),
        ]));
        assert_matches!(result, Err(ConfigError::InvalidValue { key: "TOKEN_TTL_SECS", .. }));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = ServerConfig::builder()
            .jwt_secret("super-secret-value")
            .build()
            .unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret-value"));
        assert!(debug.contains("<redacted>"));
    }
}
