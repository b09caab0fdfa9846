//! Application State
//!
//! Everything the handlers share, reached through `Arc`s. The store ports
//! are trait objects so production adapters slot in without touching the
//! handlers; tests inject in-memory implementations the same way.

use std::sync::Arc;
use uuid::Uuid;

use crate::backend::auth::revocation::RevocationCheck;
use crate::backend::chat::directory::ChatDirectory;
use crate::backend::messaging::store::MessageStore;
use crate::backend::realtime::fanout::FanoutBus;
use crate::backend::realtime::rooms::RoomTable;

/// Shared application state, cloned per request
#[derive(Clone)]
pub struct AppState {
    /// Chat lifecycle service (authorization rules + chat store)
    pub directory: Arc<ChatDirectory>,
    /// Message persistence port
    pub messages: Arc<dyn MessageStore>,
    /// Chat id -> locally attached connections
    pub rooms: Arc<RoomTable>,
    /// Cross-process publish/subscribe seam
    pub fanout: Arc<dyn FanoutBus>,
    /// Token revocation port, consulted fail-open at connect time
    pub revocation: Arc<dyn RevocationCheck>,
    /// Identifies this gateway instance on the fanout bus
    pub instance_id: Uuid,
}

impl AppState {
    pub fn new(
        directory: Arc<ChatDirectory>,
        messages: Arc<dyn MessageStore>,
        rooms: Arc<RoomTable>,
        fanout: Arc<dyn FanoutBus>,
        revocation: Arc<dyn RevocationCheck>,
    ) -> Self {
        Self {
            directory,
            messages,
            rooms,
            fanout,
            revocation,
            instance_id: Uuid::new_v4(),
        }
    }
}
