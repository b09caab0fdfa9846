//! Route Configuration
//!
//! Assembles the HTTP route table: the chat directory REST surface, the
//! message history query, the WebSocket upgrade, and a health probe.

pub mod router;

pub use router::create_router;
