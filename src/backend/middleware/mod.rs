//! Middleware Module
//!
//! This module contains the session gates used by the route table.
//!
//! # Architecture
//!
//! - **`auth`** - `verify_session`, the `authenticate` gate and the
//!   `AuthUser` extractor
//! - **`admin`** - `require_role` and the `only_admin` gate
//!
//! Both gates share one verification path and attach the decoded
//! `Identity` to the request on success. Every rejection renders as the
//! same 403 body.
//!
//! # Example
//!
//! ```rust,ignore
//! use axum::{middleware::from_fn_with_state, routing::get, Router};
//! use blogpress::backend::middleware::authenticate;
//!
//! let protected = Router::new()
//!     .route("/logout", get(logout))
//!     .route_layer(from_fn_with_state(state.clone(), authenticate));
//! ```

pub mod auth;
pub mod admin;

pub use auth::{AuthUser, authenticate, verify_session};
pub use admin::{only_admin, require_role};
