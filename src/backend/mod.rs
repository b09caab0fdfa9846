//! Backend Module
//!
//! Server-side code for the Sitelink chat core: an axum HTTP server exposing
//! the chat directory over REST, the paginated message read query, and the
//! realtime WebSocket gateway.
//!
//! # Architecture
//!
//! The backend is organized into focused submodules:
//!
//! - **`server`** - Initialization, application state, configuration
//! - **`routes`** - Route table assembly
//! - **`chat`** - Authorization rules, chat store port, directory service
//! - **`messaging`** - Message store port and the page query handler
//! - **`realtime`** - Room table, fanout bus, and the socket gateway
//! - **`auth`** - JWT verification and the revocation-check port
//! - **`middleware`** - Bearer extraction for the REST surface
//! - **`error`** - HTTP mapping for the shared error taxonomy
//!
//! # State Management
//!
//! All shared state lives in `AppState` and is reached through `Arc`s:
//! the directory and the store ports are dependency-injected resources
//! constructed once at process start, never ad hoc globals. The only
//! in-process mutable structure is the room table, which maps chat ids to
//! locally-attached connections.

/// Authentication: token verification and revocation checks
pub mod auth;

/// Chat rules, store port, and directory service
pub mod chat;

/// HTTP mapping for chat errors
pub mod error;

/// Message store port and read query
pub mod messaging;

/// Request middleware
pub mod middleware;

/// Realtime gateway: rooms, fanout, WebSocket handling
pub mod realtime;

/// Route configuration
pub mod routes;

/// Server setup and state
pub mod server;

/// Re-export commonly used types
pub use chat::directory::ChatDirectory;
pub use realtime::fanout::{FanoutBus, FanoutFrame, LocalFanoutBus};
pub use realtime::rooms::RoomTable;
pub use server::state::AppState;
