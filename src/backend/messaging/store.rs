//! Message Store Port
//!
//! Durable message persistence is an external collaborator. The port
//! contract the gateway depends on:
//!
//! - `create` persists a validated message and returns the stored aggregate;
//!   insertion order is the authoritative per-chat order for read-back.
//! - `list_by_chat_with_total` returns a newest-first page plus the total
//!   count; callers present pages ascending by creation time.
//!
//! Durability and retry are the store's responsibility; the gateway never
//! retries a failed persist.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::shared::error::ChatError;
use crate::shared::message::{Message, MessageStatus, NewMessage};

/// One page of messages plus the chat's total message count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessagePage {
    /// Newest first
    pub items: Vec<Message>,
    pub total: u64,
}

/// Message persistence operations consumed by the gateway and read query
#[async_trait]
pub trait MessageStore: Send + Sync {
    async fn create(&self, input: NewMessage) -> Result<Message, ChatError>;

    async fn list_by_chat_with_total(
        &self,
        chat_id: Uuid,
        limit: usize,
        offset: usize,
    ) -> Result<MessagePage, ChatError>;
}

/// In-memory message store for the dev server and tests
///
/// Messages are kept per chat in insertion order, which is exactly the
/// ordering guarantee the port promises.
#[derive(Default)]
pub struct InMemoryMessageStore {
    by_chat: RwLock<HashMap<Uuid, Vec<Message>>>,
}

impl InMemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn create(&self, input: NewMessage) -> Result<Message, ChatError> {
        input.validate()?;
        let message = Message {
            id: Uuid::new_v4(),
            chat_id: input.chat_id,
            from: input.from,
            to: input.to,
            text: input.text,
            attachments: input.attachments,
            message_type: input.message_type,
            status: MessageStatus::Sent,
            created_at: Utc::now(),
        };
        self.by_chat
            .write()
            .await
            .entry(message.chat_id)
            .or_default()
            .push(message.clone());
        Ok(message)
    }

    async fn list_by_chat_with_total(
        &self,
        chat_id: Uuid,
        limit: usize,
        offset: usize,
    ) -> Result<MessagePage, ChatError> {
        let by_chat = self.by_chat.read().await;
        let all = by_chat.get(&chat_id).map(Vec::as_slice).unwrap_or(&[]);
        let items = all
            .iter()
            .rev()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();
        Ok(MessagePage {
            items,
            total: all.len() as u64,
        })
    }
}
