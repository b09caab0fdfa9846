//! Process Assembly
//!
//! Builds the in-memory ports, wires them into `AppState`, starts the
//! fanout pump, and hands back the router. Production deployments swap the
//! port implementations here; nothing downstream changes.

use std::sync::Arc;

use axum::Router;

use crate::backend::auth::revocation::InMemoryRevocationList;
use crate::backend::chat::directory::ChatDirectory;
use crate::backend::chat::projects::InMemoryProjectProvider;
use crate::backend::chat::store::InMemoryChatStore;
use crate::backend::messaging::store::InMemoryMessageStore;
use crate::backend::realtime::fanout::LocalFanoutBus;
use crate::backend::realtime::gateway::spawn_fanout_pump;
use crate::backend::realtime::rooms::RoomTable;
use crate::backend::routes::router::create_router;
use crate::backend::server::state::AppState;

/// Assemble application state over the in-memory ports
pub fn build_state() -> AppState {
    let chats = Arc::new(InMemoryChatStore::new());
    let projects = Arc::new(InMemoryProjectProvider::new());
    let directory = Arc::new(ChatDirectory::new(chats, projects));

    AppState::new(
        directory,
        Arc::new(InMemoryMessageStore::new()),
        Arc::new(RoomTable::new()),
        Arc::new(LocalFanoutBus::default()),
        Arc::new(InMemoryRevocationList::new()),
    )
}

/// Start the fanout pump and build the route table
///
/// Must run inside a tokio runtime.
pub fn build_router(state: AppState) -> Router {
    spawn_fanout_pump(state.clone());
    tracing::info!("[Server] Instance {} ready", state.instance_id);
    create_router(state)
}
