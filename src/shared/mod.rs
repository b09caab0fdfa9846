//! Shared Module
//!
//! Types shared between the HTTP surface and the socket gateway. Everything
//! here is plain data designed for serialization; the two surfaces must never
//! disagree on the shape of a chat, a message, or an error.

/// Chat aggregate, participants, roles
pub mod chat;

/// Shared error taxonomy
pub mod error;

/// Socket wire protocol events
pub mod event;

/// Message aggregate and attachments
pub mod message;

/// Project snapshot consumed by the authorization rules
pub mod project;

/// Re-export commonly used types for convenience
pub use chat::{Chat, ChatType, Participant, ParticipantRole};
pub use error::ChatError;
pub use event::{ClientEvent, MessageAck, SendMessage, ServerEvent};
pub use message::{Attachment, Message, MessageStatus, MessageType, NewMessage};
pub use project::ProjectRef;
