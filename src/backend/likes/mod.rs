//! Blog Likes Module
//!
//! - **`store`** - `LikeStore` trait with in-memory and Postgres implementations
//! - **`handlers`** - HTTP handlers for `/api/blog-like`

/// Like storage
pub mod store;

/// HTTP handlers for like endpoints
pub mod handlers;

pub use handlers::{do_like, get_like, get_like_for_user};
pub use store::{LikeStore, MemoryLikeStore, PgLikeStore};
