//! Chat Directory REST Handlers
//!
//! Thin translation layer between HTTP and `ChatDirectory`: extract the
//! authenticated caller, hand off to the directory, return the chat as
//! JSON. All authorization decisions live in the rules module; nothing
//! here second-guesses them.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::backend::middleware::auth::AuthUser;
use crate::backend::server::state::AppState;
use crate::shared::chat::Chat;
use crate::shared::error::ChatError;

#[derive(Debug, Deserialize)]
pub struct CreateDirectChatRequest {
    pub peer_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct CreateProjectChatRequest {
    pub project_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct CreateGroupChatRequest {
    pub title: String,
    pub member_ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct AddParticipantRequest {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct RenameGroupRequest {
    pub title: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct MarkReadRequest {
    /// Read marker timestamp; defaults to now
    pub at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListChatsParams {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// Handle `POST /chats/direct`
pub async fn create_direct_chat(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(req): Json<CreateDirectChatRequest>,
) -> Result<Json<Chat>, ChatError> {
    let chat = state
        .directory
        .create_or_get_direct_chat(user.user_id, req.peer_id)
        .await?;
    Ok(Json(chat))
}

/// Handle `POST /chats/project`
pub async fn create_project_chat(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(req): Json<CreateProjectChatRequest>,
) -> Result<Json<Chat>, ChatError> {
    let chat = state
        .directory
        .create_or_get_project_chat(user.user_id, req.project_id)
        .await?;
    Ok(Json(chat))
}

/// Handle `POST /chats/group`
pub async fn create_group_chat(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(req): Json<CreateGroupChatRequest>,
) -> Result<Json<Chat>, ChatError> {
    let chat = state
        .directory
        .create_group_chat(user.user_id, &req.title, &req.member_ids)
        .await?;
    Ok(Json(chat))
}

/// Handle `GET /chats`
pub async fn list_chats(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(params): Query<ListChatsParams>,
) -> Result<Json<Vec<Chat>>, ChatError> {
    let chats = state
        .directory
        .list_for_user(user.user_id, params.limit, params.offset)
        .await?;
    Ok(Json(chats))
}

/// Handle `GET /chats/{chat_id}`
pub async fn get_chat(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(chat_id): Path<Uuid>,
) -> Result<Json<Chat>, ChatError> {
    let chat = state.directory.get_by_id(chat_id, user.user_id).await?;
    Ok(Json(chat))
}

/// Handle `POST /chats/{chat_id}/participants`
pub async fn add_participant(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(chat_id): Path<Uuid>,
    Json(req): Json<AddParticipantRequest>,
) -> Result<Json<Chat>, ChatError> {
    let chat = state
        .directory
        .add_participant(user.user_id, chat_id, req.user_id)
        .await?;
    Ok(Json(chat))
}

/// Handle `DELETE /chats/{chat_id}/participants/{user_id}`
pub async fn remove_participant(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path((chat_id, target)): Path<(Uuid, Uuid)>,
) -> Result<Json<Chat>, ChatError> {
    let chat = state
        .directory
        .remove_participant(user.user_id, chat_id, target)
        .await?;
    Ok(Json(chat))
}

/// Handle `POST /chats/{chat_id}/leave`
pub async fn leave_chat(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(chat_id): Path<Uuid>,
) -> Result<Json<Chat>, ChatError> {
    let chat = state.directory.leave_chat(user.user_id, chat_id).await?;
    Ok(Json(chat))
}

/// Handle `PUT /chats/{chat_id}/title`
pub async fn rename_group(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(chat_id): Path<Uuid>,
    Json(req): Json<RenameGroupRequest>,
) -> Result<Json<Chat>, ChatError> {
    let chat = state
        .directory
        .rename_group(user.user_id, chat_id, &req.title)
        .await?;
    Ok(Json(chat))
}

/// Handle `POST /chats/{chat_id}/read`
pub async fn mark_read(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(chat_id): Path<Uuid>,
    Json(req): Json<MarkReadRequest>,
) -> Result<Json<Chat>, ChatError> {
    let chat = state
        .directory
        .mark_read(user.user_id, chat_id, req.at)
        .await?;
    Ok(Json(chat))
}
