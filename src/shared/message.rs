//! Message Data Structures
//!
//! The message aggregate is owned by the external message store; the gateway
//! treats a persisted `Message` as an opaque payload and never interprets
//! `status` beyond "persisted". `NewMessage` is the write-side input,
//! validated at the boundary before it reaches the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::ChatError;

/// Maximum length of message text, in characters
pub const MAX_MESSAGE_TEXT_LEN: usize = 4000;

/// Type of message content
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    /// Plain text message
    #[default]
    Text,
    /// Image with attachment payload
    Image,
    /// File with attachment payload
    File,
    /// System message (e.g. "user joined")
    System,
}

/// Delivery status as recorded by the store
///
/// The gateway does not act on this; read markers live on the participant
/// record, not here.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MessageStatus {
    #[default]
    Sent,
    Delivered,
    Read,
}

/// A validated attachment record
///
/// Attachment payloads arrive from clients and are not trusted implicitly;
/// `validate` runs at the boundary before anything is persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Attachment {
    pub url: String,
    pub mime_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl Attachment {
    pub fn validate(&self) -> Result<(), ChatError> {
        if self.url.trim().is_empty() {
            return Err(ChatError::validation("attachments", "attachment url must not be empty"));
        }
        if self.mime_type.trim().is_empty() {
            return Err(ChatError::validation(
                "attachments",
                "attachment mime type must not be empty",
            ));
        }
        Ok(())
    }
}

/// A persisted chat message, as returned by the message store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub id: Uuid,
    pub chat_id: Uuid,
    pub from: Uuid,
    /// Set for direct chats: the peer the message addresses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub message_type: MessageType,
    #[serde(default)]
    pub status: MessageStatus,
    pub created_at: DateTime<Utc>,
}

/// Write-side input for the message store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewMessage {
    pub chat_id: Uuid,
    pub from: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub message_type: MessageType,
}

impl NewMessage {
    /// Boundary validation: a message needs text or at least one attachment,
    /// and every attachment must be well-formed.
    pub fn validate(&self) -> Result<(), ChatError> {
        let has_text = self
            .text
            .as_deref()
            .map(|t| !t.trim().is_empty())
            .unwrap_or(false);
        if !has_text && self.attachments.is_empty() {
            return Err(ChatError::validation(
                "content",
                "message requires text or at least one attachment",
            ));
        }
        if let Some(text) = &self.text {
            if text.chars().count() > MAX_MESSAGE_TEXT_LEN {
                return Err(ChatError::validation(
                    "content",
                    format!("message text exceeds {} characters", MAX_MESSAGE_TEXT_LEN),
                ));
            }
        }
        for attachment in &self.attachments {
            attachment.validate()?;
        }
        Ok(())
    }
}
