//! Route Table

use axum::{
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::backend::chat::handlers as chats;
use crate::backend::messaging::handlers as messages;
use crate::backend::realtime::gateway::handle_socket_upgrade;
use crate::backend::server::state::AppState;

/// Build the full route table over the given state
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ws", get(handle_socket_upgrade))
        .route("/chats", get(chats::list_chats))
        .route("/chats/direct", post(chats::create_direct_chat))
        .route("/chats/project", post(chats::create_project_chat))
        .route("/chats/group", post(chats::create_group_chat))
        .route("/chats/{chat_id}", get(chats::get_chat))
        .route("/chats/{chat_id}/title", put(chats::rename_group))
        .route("/chats/{chat_id}/leave", post(chats::leave_chat))
        .route("/chats/{chat_id}/read", post(chats::mark_read))
        .route("/chats/{chat_id}/participants", post(chats::add_participant))
        .route(
            "/chats/{chat_id}/participants/{user_id}",
            delete(chats::remove_participant),
        )
        .route("/chats/{chat_id}/messages", get(messages::list_messages))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
