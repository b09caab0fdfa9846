//! Server Setup
//!
//! Application state, environment configuration, and process assembly.

/// Environment-driven configuration
pub mod config;

/// Wiring: ports, services, router, background tasks
pub mod init;

/// Shared application state
pub mod state;

pub use config::ServerConfig;
pub use init::{build_router, build_state};
pub use state::AppState;
