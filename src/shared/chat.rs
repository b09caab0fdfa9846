//! Chat Aggregate
//!
//! A chat is a conversation of type `DIRECT`, `PROJECT`, or `GROUP` with an
//! ordered participant list. The type is immutable after creation.
//!
//! Invariants enforced by the directory and the authorization rules:
//!
//! - Direct chats have exactly 2 distinct participants, both `MEMBER`, and
//!   are never mutated after creation.
//! - Group chats are created with 2-200 unique participants and keep at
//!   least one `ADMIN` at all times.
//! - Project chats mirror the project team at creation time only; later
//!   team changes are reflected by explicit add/remove calls.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Minimum number of participants in a group chat
pub const MIN_GROUP_PARTICIPANTS: usize = 2;

/// Maximum number of participants in a group chat
pub const MAX_GROUP_PARTICIPANTS: usize = 200;

/// Maximum length of a group chat title, in characters
pub const MAX_GROUP_TITLE_LEN: usize = 120;

/// Conversation kind, immutable after creation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChatType {
    /// One-to-one conversation between two users
    Direct,
    /// Conversation bound to a project, at most one per project
    Project,
    /// Ad-hoc conversation with admin-managed membership
    Group,
}

/// Role of a participant within a chat
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParticipantRole {
    /// May add/remove participants and rename group chats
    Admin,
    /// Regular member
    Member,
}

/// A `(user, role, joined_at)` membership record within a chat
///
/// Unique per `(chat, user)`. `last_read_at` is the user's read marker;
/// it is the only field that changes after joining.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Participant {
    pub user_id: Uuid,
    pub role: ParticipantRole,
    pub joined_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_read_at: Option<DateTime<Utc>>,
}

impl Participant {
    /// Create a membership record joining now
    pub fn new(user_id: Uuid, role: ParticipantRole) -> Self {
        Self {
            user_id,
            role,
            joined_at: Utc::now(),
            last_read_at: None,
        }
    }
}

/// A conversation aggregate
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chat {
    /// Opaque unique identifier; doubles as the realtime room name
    pub id: Uuid,
    #[serde(rename = "type")]
    pub chat_type: ChatType,
    /// Present only for project chats
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<Uuid>,
    /// Required for group chats, derived from the project name for project
    /// chats, absent for direct chats
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Ordered by join time
    pub participants: Vec<Participant>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Chat {
    /// Assemble a new chat aggregate with fresh id and timestamps
    pub fn new(
        chat_type: ChatType,
        project_id: Option<Uuid>,
        title: Option<String>,
        participants: Vec<Participant>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            chat_type,
            project_id,
            title,
            participants,
            created_at: now,
            updated_at: now,
        }
    }

    /// Find the membership record for a user
    pub fn participant(&self, user_id: Uuid) -> Option<&Participant> {
        self.participants.iter().find(|p| p.user_id == user_id)
    }

    /// Whether the user is a participant of this chat
    pub fn is_participant(&self, user_id: Uuid) -> bool {
        self.participant(user_id).is_some()
    }

    /// Whether the user is a participant with the `Admin` role
    pub fn is_admin(&self, user_id: Uuid) -> bool {
        matches!(
            self.participant(user_id),
            Some(p) if p.role == ParticipantRole::Admin
        )
    }

    /// Number of participants holding the `Admin` role
    pub fn admin_count(&self) -> usize {
        self.participants
            .iter()
            .filter(|p| p.role == ParticipantRole::Admin)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_member_chat(a: Uuid, b: Uuid) -> Chat {
        Chat::new(
            ChatType::Direct,
            None,
            None,
            vec![
                Participant::new(a, ParticipantRole::Member),
                Participant::new(b, ParticipantRole::Member),
            ],
        )
    }

    #[test]
    fn test_participant_lookup() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let chat = two_member_chat(a, b);

        assert!(chat.is_participant(a));
        assert!(chat.is_participant(b));
        assert!(!chat.is_participant(Uuid::new_v4()));
    }

    #[test]
    fn test_admin_count() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let chat = Chat::new(
            ChatType::Group,
            None,
            Some("Site crew".to_string()),
            vec![
                Participant::new(a, ParticipantRole::Admin),
                Participant::new(b, ParticipantRole::Member),
            ],
        );

        assert_eq!(chat.admin_count(), 1);
        assert!(chat.is_admin(a));
        assert!(!chat.is_admin(b));
    }

    #[test]
    fn test_chat_type_wire_format() {
        let json = serde_json::to_string(&ChatType::Project).unwrap();
        assert_eq!(json, "\"PROJECT\"");
        let back: ChatType = serde_json::from_str("\"DIRECT\"").unwrap();
        assert_eq!(back, ChatType::Direct);
    }

    #[test]
    fn test_chat_serializes_type_field() {
        let chat = two_member_chat(Uuid::new_v4(), Uuid::new_v4());
        let value = serde_json::to_value(&chat).unwrap();
        assert_eq!(value["type"], "DIRECT");
        assert!(value.get("project_id").is_none());
    }
}
