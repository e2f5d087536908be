//! Authentication Module
//!
//! This module handles accounts, session tokens and the session cookie.
//!
//! # Architecture
//!
//! - **`users`** - User record, `UserStore` trait and its in-memory and
//!   Postgres implementations, bcrypt helpers
//! - **`sessions`** - `TokenIssuer`: signs and verifies HS256 session tokens
//! - **`cookie`** - `access_token` cookie attributes, set and clear
//! - **`federated`** - Google ID token verification for google-login
//! - **`handlers`** - HTTP handlers for the `/api/auth` endpoints
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs          - Module exports and documentation
//! ├── users.rs        - User model and credential stores
//! ├── sessions.rs     - Token issuing and verification
//! ├── cookie.rs       - Session cookie transport
//! ├── federated.rs    - Google ID token verification
//! └── handlers/       - HTTP handlers
//! ```
//!
//! # Session Flow
//!
//! 1. **Register / login / google-login**: password or verified Google ID
//!    token accepted → token issued → `access_token` cookie set
//! 2. **Gated request**: cookie read → signature and expiry checked →
//!    identity `{id, role}` attached to the request
//! 3. **Logout**: cookie cleared
//!
//! # Security
//!
//! - Passwords are hashed with bcrypt before storage
//! - Tokens carry only the user id, role and timestamps
//! - The cookie is HTTP-only so page scripts cannot read it

/// User data model and credential stores
pub mod users;

/// Session token issuing and verification
pub mod sessions;

/// Session cookie transport
pub mod cookie;

/// Google ID token verification
pub mod federated;

/// HTTP handlers for authentication endpoints
pub mod handlers;

pub use cookie::CookieSettings;
pub use federated::{FederatedProfile, IdTokenVerifier};
pub use handlers::{add_admin, get_me, google_login, login, logout, register};
pub use sessions::{Claims, Identity, TokenIssuer};
pub use users::{MemoryUserStore, PgUserStore, User, UserStore};
