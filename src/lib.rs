//! blogpress - Blog Backend Library
//!
//! Accounts, cookie-based sessions with role gates, and blog likes, served
//! over HTTP with Axum.
//!
//! # Module Structure
//!
//! - **`shared`** - Types shared with clients: roles, user and like
//!   payloads, validation errors
//! - **`backend`** - Server-side code (only compiled with the `ssr` feature)
//!   - Configuration and app creation
//!   - Session tokens, the `access_token` cookie, `authenticate` and
//!     `only_admin` gates
//!   - Auth and like handlers with in-memory or Postgres stores
//!
//! # Feature Flags
//!
//! - **`ssr`** (default) - enables the backend modules and the server binary
//!
//! # Usage
//!
//! ```rust,ignore
//! use blogpress::backend::server::{create_app, ServerConfig};
//!
//! let config = ServerConfig::from_env()?;
//! let app = create_app(&config).await?;
//! let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
//! axum::serve(listener, app).await?;
//! ```
//!
//! # Sessions
//!
//! A session is an HS256 token holding the user id, role, issue time and
//! expiry. It travels only in the HTTP-only `access_token` cookie and is
//! re-verified on every gated request. No session state is kept on the
//! server.

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;
