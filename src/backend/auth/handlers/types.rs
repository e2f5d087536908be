/**
 * Authentication Handler Types
 *
 * This module defines the request and response types used by the
 * authentication handlers.
 */

use serde::{Deserialize, Serialize};

use crate::backend::auth::users::User;
use crate::shared::UserResponse;

/// Registration request
#[derive(Deserialize, Serialize, Debug)]
pub struct RegisterRequest {
    /// Display name
    pub name: String,
    /// Email address, unique per account
    pub email: String,
    /// Password (hashed before storage)
    pub password: String,
}

/// Login request
#[derive(Deserialize, Serialize, Debug)]
pub struct LoginRequest {
    pub email: String,
    /// Password (verified against the stored hash)
    pub password: String,
}

/// Federated (Google) login request
///
/// `credential` is the ID token returned by Google sign-in on the client.
/// Name, email and avatar are read from the verified token, never from the
/// request body.
#[derive(Deserialize, Serialize, Debug)]
pub struct GoogleLoginRequest {
    pub credential: String,
}

/// Admin promotion request
#[derive(Deserialize, Serialize, Debug)]
pub struct AddAdminRequest {
    /// Email of the account to promote
    pub email: String,
}

/// Auth response
///
/// Returned by register, login, federated login and admin promotion. The
/// session token itself only travels in the cookie.
#[derive(Serialize, Deserialize, Debug)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    /// User information (without sensitive data)
    pub user: UserResponse,
}

impl AuthResponse {
    pub fn new(message: impl Into<String>, user: &User) -> Self {
        Self {
            success: true,
            message: message.into(),
            user: user.to_response(),
        }
    }
}

/// Plain success response
#[derive(Serialize, Deserialize, Debug)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}
