/**
 * Session Cookie Transport
 *
 * The session token travels between client and server in a single
 * HTTP-only cookie named `access_token`. It is set on register, login and
 * federated login, and cleared on logout.
 *
 * Cookie attributes:
 * - `HttpOnly`, `Path=/`
 * - `Max-Age` equal to the token lifetime
 * - `Secure` + `SameSite=None` when configured secure (cross-site frontend
 *   over HTTPS), otherwise `SameSite=Strict`
 */

use std::time::Duration;

use axum_extra::extract::CookieJar;
use cookie::{Cookie, SameSite};

use crate::backend::server::config::{ServerConfig, SESSION_COOKIE_NAME};

/// Attributes applied to the session cookie
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookieSettings {
    /// Emit `Secure` and `SameSite=None`
    pub secure: bool,
    /// Cookie lifetime
    pub max_age: Duration,
}

impl CookieSettings {
    /// Settings derived from the server configuration
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            secure: config.cookie_secure,
            max_age: config.token_ttl,
        }
    }

    fn same_site(&self) -> SameSite {
        if self.secure {
            SameSite::None
        } else {
            SameSite::Strict
        }
    }

    /// Build the cookie carrying `token`
    pub fn session_cookie(&self, token: String) -> Cookie<'static> {
        let max_age = i64::try_from(self.max_age.as_secs()).unwrap_or(i64::MAX);

        Cookie::build((SESSION_COOKIE_NAME, token))
            .http_only(true)
            .secure(self.secure)
            .same_site(self.same_site())
            .path("/")
            .max_age(time::Duration::seconds(max_age))
            .build()
    }

    /// Add the session cookie to `jar`
    pub fn set(&self, jar: CookieJar, token: String) -> CookieJar {
        jar.add(self.session_cookie(token))
    }

    /// Clear the session cookie from `jar`
    ///
    /// Path and same-site attributes must match the original cookie for
    /// browsers to drop it.
    pub fn clear(&self, jar: CookieJar) -> CookieJar {
        jar.remove(
            Cookie::build(SESSION_COOKIE_NAME)
                .http_only(true)
                .secure(self.secure)
                .same_site(self.same_site())
                .path("/"),
        )
    }
}

/// Raw session token from the request cookies, if present and non-empty
pub fn session_token(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE_NAME)
        .map(|cookie| cookie.value().trim().to_string())
        .filter(|value| !value.is_empty())
}
