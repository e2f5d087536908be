//! Shared Module
//!
//! This module contains types and data structures that are shared between
//! the server and its clients. These types describe the JSON payloads of the
//! REST API and are usable without the `ssr` feature.

/// Roles and the public user representation
pub mod user;

/// Blog like payloads
pub mod like;

/// Shared error types
pub mod error;

/// Re-export commonly used types for convenience
pub use user::{Role, UserResponse};
pub use like::{DoLikeRequest, DoLikeResponse, LikeCountResponse};
pub use error::SharedError;
