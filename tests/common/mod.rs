//! Shared fixtures for the integration suites.
#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use sitelink::backend::auth::revocation::InMemoryRevocationList;
use sitelink::backend::chat::directory::ChatDirectory;
use sitelink::backend::chat::projects::InMemoryProjectProvider;
use sitelink::backend::chat::store::InMemoryChatStore;
use sitelink::backend::messaging::store::{InMemoryMessageStore, MessagePage, MessageStore};
use sitelink::backend::realtime::fanout::{FanoutBus, LocalFanoutBus};
use sitelink::backend::realtime::rooms::RoomTable;
use sitelink::backend::server::state::AppState;
use sitelink::shared::chat::Chat;
use sitelink::shared::error::ChatError;
use sitelink::shared::event::SendMessage;
use sitelink::shared::message::{Message, NewMessage};

/// Fresh state over in-memory ports with a private fanout bus
pub fn state() -> AppState {
    state_on_bus(Arc::new(LocalFanoutBus::default()))
}

/// Fresh state sharing a fanout bus, as two gateway instances would
pub fn state_on_bus(fanout: Arc<dyn FanoutBus>) -> AppState {
    let directory = Arc::new(ChatDirectory::new(
        Arc::new(InMemoryChatStore::new()),
        Arc::new(InMemoryProjectProvider::new()),
    ));
    AppState::new(
        directory,
        Arc::new(InMemoryMessageStore::new()),
        Arc::new(RoomTable::new()),
        fanout,
        Arc::new(InMemoryRevocationList::new()),
    )
}

/// Fresh state with the message store swapped out
pub fn state_with_messages(messages: Arc<dyn MessageStore>) -> AppState {
    let base = state();
    AppState::new(
        base.directory,
        messages,
        base.rooms,
        base.fanout,
        base.revocation,
    )
}

/// Message store that refuses every call, as an unreachable database would
pub struct FailingMessageStore;

#[async_trait]
impl MessageStore for FailingMessageStore {
    async fn create(&self, _input: NewMessage) -> Result<Message, ChatError> {
        Err(ChatError::store_unavailable("message store offline"))
    }

    async fn list_by_chat_with_total(
        &self,
        _chat_id: Uuid,
        _limit: usize,
        _offset: usize,
    ) -> Result<MessagePage, ChatError> {
        Err(ChatError::store_unavailable("message store offline"))
    }
}

pub async fn seed_direct_chat(state: &AppState, a: Uuid, b: Uuid) -> Chat {
    state
        .directory
        .create_or_get_direct_chat(a, b)
        .await
        .expect("direct chat fixture")
}

pub fn text_frame(room: Option<Uuid>, content: &str, temp_id: &str) -> SendMessage {
    SendMessage {
        room,
        content: Some(content.to_string()),
        attachments: Vec::new(),
        message_type: None,
        temp_id: temp_id.to_string(),
    }
}
