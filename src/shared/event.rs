//! Socket Wire Protocol
//!
//! JSON frames exchanged over the gateway WebSocket. Frames are internally
//! tagged by an `event` field:
//!
//! Client to server: `join`, `leave`, `message:send`.
//! Server to client: `message:new` (room broadcast), `message:ack` (unicast
//! to the sender, correlated by the client-generated `temp_id`).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::message::{Attachment, Message, MessageType};

/// `message:send` payload
///
/// `room` is optional at the type level so that a frame missing it still
/// deserializes and can be rejected with an acknowledgement carrying the
/// original `temp_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SendMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_type: Option<MessageType>,
    /// Client-generated id used to correlate the acknowledgement
    pub temp_id: String,
}

/// Frames a client may send to the gateway
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum ClientEvent {
    /// Subscribe this connection to a room (advisory, no membership check)
    #[serde(rename = "join")]
    Join { room: Uuid },
    /// Unsubscribe; a no-op when not joined
    #[serde(rename = "leave")]
    Leave { room: Uuid },
    /// Send a message into a room
    #[serde(rename = "message:send")]
    Send(SendMessage),
}

/// Acknowledgement for a single `message:send`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageAck {
    pub temp_id: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MessageAck {
    /// Success ack carrying the server-assigned id and the persisted message
    pub fn accepted(temp_id: String, message: Message) -> Self {
        Self {
            temp_id,
            success: true,
            message_id: Some(message.id),
            message: Some(message),
            error: None,
        }
    }

    /// Error ack carrying the failure reason
    pub fn rejected(temp_id: String, error: impl Into<String>) -> Self {
        Self {
            temp_id,
            success: false,
            message_id: None,
            message: None,
            error: Some(error.into()),
        }
    }
}

/// Frames the gateway may send to a client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum ServerEvent {
    /// A persisted message, broadcast to every connection in the room
    #[serde(rename = "message:new")]
    MessageNew { message: Message },
    /// Unicast reply to the sending connection only
    #[serde(rename = "message:ack")]
    Ack(MessageAck),
}
