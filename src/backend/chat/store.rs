//! Chat Persistence Port
//!
//! Durable chat storage is an external collaborator; this module defines the
//! port the directory depends on plus an in-memory implementation used by
//! the dev server and tests.
//!
//! The one uniqueness guarantee the port must honor is the direct-chat pair
//! key: `create` for a direct chat fails when a chat for the same unordered
//! user pair already exists, which lets the directory converge concurrent
//! create calls onto a single chat. Project-chat uniqueness is a directory
//! invariant, deliberately not enforced here.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::shared::chat::{Chat, ChatType, Participant};
use crate::shared::error::ChatError;

/// Chat persistence operations consumed by the directory
#[async_trait]
pub trait ChatStore: Send + Sync {
    /// Persist a new chat aggregate; fails for a duplicate direct pair
    async fn create(&self, chat: Chat) -> Result<Chat, ChatError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Chat>, ChatError>;

    /// Look up the direct chat for an unordered user pair
    async fn find_direct_by_members(&self, a: Uuid, b: Uuid) -> Result<Option<Chat>, ChatError>;

    /// Look up a chat by `(type = PROJECT, project_id)`
    async fn find_project_chat(&self, project_id: Uuid) -> Result<Option<Chat>, ChatError>;

    /// Chats the user participates in, most recently updated first
    async fn list_by_user(
        &self,
        user_id: Uuid,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Chat>, ChatError>;

    /// Replace the stored aggregate (last-write-wins)
    async fn update(&self, chat: Chat) -> Result<Chat, ChatError>;

    /// Append a participant; fails if already present
    async fn add_participant(&self, chat_id: Uuid, participant: Participant)
        -> Result<Chat, ChatError>;

    /// Remove a participant; fails if absent
    async fn remove_participant(&self, chat_id: Uuid, user_id: Uuid) -> Result<Chat, ChatError>;
}

/// Normalize an unordered user pair into a stable index key
fn pair_key(a: Uuid, b: Uuid) -> (Uuid, Uuid) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[derive(Default)]
struct Inner {
    chats: HashMap<Uuid, Chat>,
    /// Sorted-pair index enforcing direct-chat uniqueness
    direct_index: HashMap<(Uuid, Uuid), Uuid>,
}

/// In-memory chat store for the dev server and tests
#[derive(Default)]
pub struct InMemoryChatStore {
    inner: RwLock<Inner>,
}

impl InMemoryChatStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChatStore for InMemoryChatStore {
    async fn create(&self, chat: Chat) -> Result<Chat, ChatError> {
        let mut inner = self.inner.write().await;
        if chat.chat_type == ChatType::Direct {
            let members: Vec<Uuid> = chat.participants.iter().map(|p| p.user_id).collect();
            if members.len() != 2 {
                return Err(ChatError::validation(
                    "participants",
                    "direct chats require exactly two participants",
                ));
            }
            let key = pair_key(members[0], members[1]);
            if inner.direct_index.contains_key(&key) {
                return Err(ChatError::validation(
                    "participants",
                    "a direct chat already exists for this pair",
                ));
            }
            inner.direct_index.insert(key, chat.id);
        }
        inner.chats.insert(chat.id, chat.clone());
        Ok(chat)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Chat>, ChatError> {
        Ok(self.inner.read().await.chats.get(&id).cloned())
    }

    async fn find_direct_by_members(&self, a: Uuid, b: Uuid) -> Result<Option<Chat>, ChatError> {
        let inner = self.inner.read().await;
        Ok(inner
            .direct_index
            .get(&pair_key(a, b))
            .and_then(|id| inner.chats.get(id))
            .cloned())
    }

    async fn find_project_chat(&self, project_id: Uuid) -> Result<Option<Chat>, ChatError> {
        let inner = self.inner.read().await;
        Ok(inner
            .chats
            .values()
            .find(|c| c.chat_type == ChatType::Project && c.project_id == Some(project_id))
            .cloned())
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Chat>, ChatError> {
        let inner = self.inner.read().await;
        let mut chats: Vec<Chat> = inner
            .chats
            .values()
            .filter(|c| c.is_participant(user_id))
            .cloned()
            .collect();
        chats.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(chats.into_iter().skip(offset).take(limit).collect())
    }

    async fn update(&self, chat: Chat) -> Result<Chat, ChatError> {
        let mut inner = self.inner.write().await;
        if !inner.chats.contains_key(&chat.id) {
            return Err(ChatError::not_found("chat", chat.id));
        }
        inner.chats.insert(chat.id, chat.clone());
        Ok(chat)
    }

    async fn add_participant(
        &self,
        chat_id: Uuid,
        participant: Participant,
    ) -> Result<Chat, ChatError> {
        let mut inner = self.inner.write().await;
        let chat = inner
            .chats
            .get_mut(&chat_id)
            .ok_or_else(|| ChatError::not_found("chat", chat_id))?;
        if chat.is_participant(participant.user_id) {
            return Err(ChatError::validation(
                "user_id",
                "user is already a participant",
            ));
        }
        chat.participants.push(participant);
        chat.updated_at = Utc::now();
        Ok(chat.clone())
    }

    async fn remove_participant(&self, chat_id: Uuid, user_id: Uuid) -> Result<Chat, ChatError> {
        let mut inner = self.inner.write().await;
        let chat = inner
            .chats
            .get_mut(&chat_id)
            .ok_or_else(|| ChatError::not_found("chat", chat_id))?;
        let before = chat.participants.len();
        chat.participants.retain(|p| p.user_id != user_id);
        if chat.participants.len() == before {
            return Err(ChatError::not_found("participant", user_id));
        }
        chat.updated_at = Utc::now();
        Ok(chat.clone())
    }
}
