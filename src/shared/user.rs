/**
 * User Identity Types
 *
 * This module defines the role enumeration carried inside session tokens
 * and the public user representation returned by the auth endpoints.
 *
 * Both types are shared so that clients can deserialize responses with the
 * same definitions the server serializes with.
 */
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::shared::error::SharedError;

/// Role of an account
///
/// Serialized in lowercase (`"user"` / `"admin"`), both in JSON responses
/// and inside the signed session token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular account, the default for every registration
    #[default]
    User,
    /// Administrator, required by admin-gated routes
    Admin,
}

impl Role {
    /// Lowercase wire name of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            other => Err(SharedError::validation("role", format!("unknown role '{}'", other))),
        }
    }
}

/// User response (without sensitive data)
///
/// Contains user information that is safe to return to clients.
/// Never includes the password hash.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserResponse {
    /// User's unique ID (UUID)
    pub id: String,
    /// Display name
    pub name: String,
    /// Email address (lower-cased)
    pub email: String,
    /// Account role
    pub role: Role,
    /// Avatar URL, set by federated login
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}
