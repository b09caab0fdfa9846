//! Chat Backend
//!
//! Membership and authorization for conversations. `rules` is the single
//! source of truth consumed by both the REST handlers and the socket
//! gateway; `directory` owns chat lifecycle on top of the `store` port.

/// Chat directory service
pub mod directory;

/// REST handlers for directory operations
pub mod handlers;

/// Project provider port
pub mod projects;

/// Pure authorization rules
pub mod rules;

/// Chat persistence port
pub mod store;

pub use directory::ChatDirectory;
pub use projects::{InMemoryProjectProvider, ProjectProvider};
pub use store::{ChatStore, InMemoryChatStore};
