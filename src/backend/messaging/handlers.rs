//! Message Read Query
//!
//! `GET /chats/{chat_id}/messages` - the paginated history query. This is
//! the recovery path for clients that missed a realtime broadcast, so it
//! goes through the same membership gate as the gateway and presents
//! messages ascending by creation time.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::chat::directory::clamp_limit;
use crate::backend::middleware::auth::AuthUser;
use crate::backend::server::state::AppState;
use crate::shared::error::ChatError;
use crate::shared::message::Message;

#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// One page of chat history, ascending by creation time
#[derive(Debug, Serialize, Deserialize)]
pub struct MessagePageResponse {
    pub items: Vec<Message>,
    pub total: u64,
    pub limit: usize,
    pub offset: usize,
}

/// Handle `GET /chats/{chat_id}/messages`
pub async fn list_messages(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(chat_id): Path<Uuid>,
    Query(params): Query<PageParams>,
) -> Result<Json<MessagePageResponse>, ChatError> {
    // Membership gate; NotFound / PermissionDenied propagate as-is.
    state.directory.get_by_id(chat_id, user.user_id).await?;

    let limit = clamp_limit(params.limit);
    let offset = params.offset.unwrap_or(0);

    let page = state
        .messages
        .list_by_chat_with_total(chat_id, limit, offset)
        .await?;

    // The store hands back newest-first; the API presents ascending.
    let mut items = page.items;
    items.reverse();

    Ok(Json(MessagePageResponse {
        items,
        total: page.total,
        limit,
        offset,
    }))
}
