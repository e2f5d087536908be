//! Backend Module
//!
//! This module contains all server-side code for blogpress: an Axum HTTP
//! server providing accounts, cookie sessions with role gates, and blog likes.
//!
//! This module is only compiled when the `ssr` feature is enabled.
//!
//! # Architecture
//!
//! - **`server`** - Configuration, application state, app creation
//! - **`routes`** - Route table and router assembly
//! - **`auth`** - Accounts, session tokens, session cookie, auth handlers
//! - **`middleware`** - The `authenticate` and `only_admin` gates
//! - **`likes`** - Blog like storage and handlers
//! - **`error`** - Backend error types and their HTTP rendering
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── server/         - Server initialization and state
//! ├── routes/         - Route configuration
//! ├── auth/           - Authentication
//! ├── middleware/     - Session gates
//! ├── likes/          - Blog likes
//! └── error/          - Error types
//! ```
//!
//! # Request Handling
//!
//! Requests are independent. The only process-wide data is the signing key
//! material, fixed at startup; the stores are the sole shared mutable state
//! and synchronize internally (`tokio::sync::RwLock` in memory, the database
//! otherwise).
//!
//! # Error Handling
//!
//! Handlers and gates return `BackendError`, which renders every failure as
//! `{ "success": false, "statusCode": n, "message": "..." }`.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Backend error types
pub mod error;

/// Authentication and user management
pub mod auth;

/// Session gates
pub mod middleware;

/// Blog likes
pub mod likes;

pub use error::BackendError;
pub use server::create_app;
