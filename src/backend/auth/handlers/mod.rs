//! Authentication Handlers Module
//!
//! This module contains all HTTP handlers for the `/api/auth` endpoints.
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs           - Module exports and documentation
//! ├── types.rs         - Request and response types
//! ├── register.rs      - Account registration
//! ├── login.rs         - Password login and session start
//! ├── google_login.rs  - Federated login (find or create)
//! ├── logout.rs        - Session cookie removal
//! ├── add_admin.rs     - Admin promotion
//! └── me.rs            - Current session identity
//! ```
//!
//! # Handlers
//!
//! - **`register`** - POST /api/auth/register
//! - **`login`** - POST /api/auth/login
//! - **`google_login`** - POST /api/auth/google-login
//! - **`logout`** - GET /api/auth/logout (behind `authenticate`)
//! - **`add_admin`** - POST /api/auth/add-admin (behind `only_admin`)
//! - **`get_me`** - GET /api/auth/me (behind `authenticate`)
//!
//! Register, login and federated login all finish the same way: a token is
//! issued for the user and delivered in the `access_token` cookie. The token
//! never appears in a response body.

/// Request and response types
pub mod types;

/// Registration handler
pub mod register;

/// Login handler
pub mod login;

/// Federated login handler
pub mod google_login;

/// Logout handler
pub mod logout;

/// Admin promotion handler
pub mod add_admin;

/// Current session handler
pub mod me;

pub use types::{AddAdminRequest, AuthResponse, GoogleLoginRequest, LoginRequest, MessageResponse, RegisterRequest};

pub use add_admin::add_admin;
pub use google_login::google_login;
pub use login::login;
pub use logout::logout;
pub use me::get_me;
pub use register::register;
