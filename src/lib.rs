//! Sitelink - construction-project collaboration backend
//!
//! Sitelink is the chat and real-time messaging core of a construction-project
//! collaboration platform. Projects, tasks, reports and documents live in
//! sibling services; this crate owns the one subsystem with genuine
//! concurrency and distributed-fanout concerns:
//!
//! - Chat membership and authorization rules (pure, no I/O)
//! - The chat directory service (create-or-reuse, participant management)
//! - The socket gateway: authenticated WebSocket connections, room join/leave,
//!   membership-checked sends, persist-before-broadcast delivery, and
//!   cross-process fanout so horizontally-scaled instances stay consistent
//!
//! # Module Structure
//!
//! - **`shared`** - Types that cross surface boundaries: chat and message
//!   aggregates, the socket wire protocol, and the error taxonomy.
//! - **`backend`** - The axum server: routes, handlers, the chat directory,
//!   the message store port, and the realtime gateway.
//!
//! # Storage
//!
//! Durable storage is an external collaborator. The crate defines ports
//! (`ChatStore`, `MessageStore`, `ProjectProvider`, `RevocationCheck`,
//! `FanoutBus`) and ships in-memory implementations used by the dev server
//! and the test suite.

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
pub mod backend;
