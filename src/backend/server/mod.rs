//! Server Module
//!
//! This module contains the server-side code for configuring and assembling
//! the Axum application.
//!
//! - **`config`** - `ServerConfig` loaded from the environment and validated
//!   at startup, plus the optional database connection
//! - **`state`** - `AppState` and its `FromRef` implementations
//! - **`init`** - `create_app`, which wires stores, state and router, and
//!   `seed_admin` for the startup admin account
//!
//! ```text
//! server/
//! ├── mod.rs          - Module exports and documentation
//! ├── config.rs       - Configuration loading
//! ├── state.rs        - AppState and FromRef implementations
//! └── init.rs         - Server initialization and app creation
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use blogpress::backend::server::{create_app, ServerConfig};
//!
//! let config = ServerConfig::from_env()?;
//! let app = create_app(&config).await?;
//! ```

/// Application state management
pub mod state;

/// Server configuration loading
pub mod config;

/// Server initialization
pub mod init;

pub use config::{ConfigError, ServerConfig};
pub use init::{create_app, seed_admin};
pub use state::AppState;
