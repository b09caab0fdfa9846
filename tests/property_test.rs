//! Property tests for the pure validation and authorization boundaries.

use proptest::prelude::*;
use uuid::Uuid;

use sitelink::backend::chat::directory::{clamp_limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use sitelink::backend::chat::rules::can_create_group_chat;
use sitelink::shared::chat::{MAX_GROUP_PARTICIPANTS, MIN_GROUP_PARTICIPANTS};
use sitelink::shared::event::ClientEvent;
use sitelink::shared::message::{NewMessage, MessageType, MAX_MESSAGE_TEXT_LEN};

fn text_message(text: String) -> NewMessage {
    NewMessage {
        chat_id: Uuid::new_v4(),
        from: Uuid::new_v4(),
        to: None,
        text: Some(text),
        attachments: Vec::new(),
        message_type: MessageType::Text,
    }
}

proptest! {
    #[test]
    fn prop_clamp_limit_stays_in_bounds(limit in proptest::option::of(0usize..10_000)) {
        let clamped = clamp_limit(limit);
        prop_assert!(clamped >= 1);
        prop_assert!(clamped <= MAX_LIST_LIMIT);
        if limit.is_none() {
            prop_assert_eq!(clamped, DEFAULT_LIST_LIMIT);
        }
    }

    #[test]
    fn prop_group_size_rule_counts_distinct_users(extra in 0usize..300, duplicates in 0usize..5) {
        let initiator = Uuid::new_v4();
        let mut members: Vec<Uuid> = (0..extra).map(|_| Uuid::new_v4()).collect();
        // Duplicates of the initiator never change the distinct count.
        members.extend(std::iter::repeat(initiator).take(duplicates));

        let distinct = extra + 1;
        let expected = (MIN_GROUP_PARTICIPANTS..=MAX_GROUP_PARTICIPANTS).contains(&distinct);
        prop_assert_eq!(can_create_group_chat(initiator, &members), expected);
    }

    #[test]
    fn prop_message_text_length_boundary(len in 0usize..=MAX_MESSAGE_TEXT_LEN + 200) {
        let input = text_message("x".repeat(len));
        let accepted = input.validate().is_ok();
        // Empty text with no attachments is rejected, as is oversized text.
        prop_assert_eq!(accepted, len > 0 && len <= MAX_MESSAGE_TEXT_LEN);
    }

    #[test]
    fn prop_client_frames_roundtrip(content in ".{0,64}", temp_id in "[a-z0-9-]{1,16}") {
        let frame = ClientEvent::Send(sitelink::shared::event::SendMessage {
            room: Some(Uuid::new_v4()),
            content: Some(content),
            attachments: Vec::new(),
            message_type: None,
            temp_id,
        });
        let json = serde_json::to_string(&frame).unwrap();
        let back: ClientEvent = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, frame);
    }
}
