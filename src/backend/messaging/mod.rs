//! Messaging
//!
//! The message store port and the paginated read query. The store owns the
//! message aggregate; this crate validates input at the boundary, persists
//! through the port, and reads pages back for recovery and history.

/// Paginated message read handler
pub mod handlers;

/// Message store port
pub mod store;

pub use store::{InMemoryMessageStore, MessagePage, MessageStore};
