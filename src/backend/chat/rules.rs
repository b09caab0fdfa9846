//! Chat Authorization Rules
//!
//! Pure, side-effect-free predicates over `(actor, chat, target, project)`.
//! Both the REST chat handlers and the socket gateway go through these
//! functions, so the two surfaces can never disagree on membership.
//!
//! Each predicate has an `ensure_*` wrapper that turns `false` into a
//! `PermissionDenied` error with a human-readable reason.

use std::collections::HashSet;
use uuid::Uuid;

use crate::shared::chat::{
    Chat, ChatType, MAX_GROUP_PARTICIPANTS, MIN_GROUP_PARTICIPANTS,
};
use crate::shared::error::ChatError;
use crate::shared::project::ProjectRef;

/// Both ids non-empty and distinct
pub fn can_create_direct_chat(initiator: Uuid, peer: Uuid) -> bool {
    !initiator.is_nil() && !peer.is_nil() && initiator != peer
}

/// Initiator is the project owner or a team member
pub fn can_create_project_chat(initiator: Uuid, project: &ProjectRef) -> bool {
    project.is_owner(initiator) || project.is_team_member(initiator)
}

/// The union of `{initiator}` and `member_ids` has 2 to 200 distinct users
pub fn can_create_group_chat(initiator: Uuid, member_ids: &[Uuid]) -> bool {
    let mut unique: HashSet<Uuid> = member_ids.iter().copied().collect();
    unique.insert(initiator);
    (MIN_GROUP_PARTICIPANTS..=MAX_GROUP_PARTICIPANTS).contains(&unique.len())
}

/// Actor must already be a participant; direct chats always deny; group
/// chats require the actor to be an admin; project chats require the target
/// to belong to the project team.
pub fn can_add_participant(
    actor: Uuid,
    chat: &Chat,
    target: Uuid,
    project: Option<&ProjectRef>,
) -> bool {
    if !chat.is_participant(actor) {
        return false;
    }
    match chat.chat_type {
        ChatType::Direct => false,
        ChatType::Group => chat.is_admin(actor),
        ChatType::Project => match project {
            Some(p) => p.is_owner(target) || p.is_team_member(target),
            None => false,
        },
    }
}

/// Actor and target both participants; direct chats always deny; group
/// removal requires an admin actor and spares the sole remaining admin;
/// project chats never allow removing the project owner.
pub fn can_remove_participant(
    actor: Uuid,
    chat: &Chat,
    target: Uuid,
    project: Option<&ProjectRef>,
) -> bool {
    if !chat.is_participant(actor) || !chat.is_participant(target) {
        return false;
    }
    match chat.chat_type {
        ChatType::Direct => false,
        ChatType::Group => {
            if !chat.is_admin(actor) {
                return false;
            }
            // Never orphan a group without admins.
            !(chat.is_admin(target) && chat.admin_count() == 1)
        }
        ChatType::Project => match project {
            Some(p) => !p.is_owner(target),
            None => false,
        },
    }
}

/// Participant required; direct chats deny; group chats deny the sole admin
pub fn can_leave_chat(user_id: Uuid, chat: &Chat) -> bool {
    if !chat.is_participant(user_id) {
        return false;
    }
    match chat.chat_type {
        ChatType::Direct => false,
        ChatType::Group => !(chat.is_admin(user_id) && chat.admin_count() == 1),
        ChatType::Project => true,
    }
}

/// Only group admins may rename, and only group chats are renameable
pub fn can_rename_group(actor: Uuid, chat: &Chat) -> bool {
    chat.chat_type == ChatType::Group && chat.is_admin(actor)
}

/// Membership is the whole story for reading
pub fn can_view_messages(user_id: Uuid, chat: &Chat) -> bool {
    chat.is_participant(user_id)
}

pub fn ensure_can_create_direct_chat(initiator: Uuid, peer: Uuid) -> Result<(), ChatError> {
    if can_create_direct_chat(initiator, peer) {
        Ok(())
    } else if initiator == peer {
        Err(ChatError::permission_denied(
            "cannot open a direct chat with yourself",
        ))
    } else {
        Err(ChatError::permission_denied(
            "direct chats need two distinct users",
        ))
    }
}

pub fn ensure_can_create_project_chat(
    initiator: Uuid,
    project: &ProjectRef,
) -> Result<(), ChatError> {
    if can_create_project_chat(initiator, project) {
        Ok(())
    } else {
        Err(ChatError::permission_denied(
            "only the project owner or team members may open the project chat",
        ))
    }
}

pub fn ensure_can_create_group_chat(initiator: Uuid, member_ids: &[Uuid]) -> Result<(), ChatError> {
    if can_create_group_chat(initiator, member_ids) {
        Ok(())
    } else {
        Err(ChatError::validation(
            "member_ids",
            format!(
                "group chats need between {} and {} unique participants",
                MIN_GROUP_PARTICIPANTS, MAX_GROUP_PARTICIPANTS
            ),
        ))
    }
}

pub fn ensure_can_add_participant(
    actor: Uuid,
    chat: &Chat,
    target: Uuid,
    project: Option<&ProjectRef>,
) -> Result<(), ChatError> {
    if can_add_participant(actor, chat, target, project) {
        return Ok(());
    }
    let reason = if !chat.is_participant(actor) {
        "not a participant of this chat"
    } else {
        match chat.chat_type {
            ChatType::Direct => "direct chats cannot be modified",
            ChatType::Group => "only group admins may add participants",
            ChatType::Project => "target user is not on the project team",
        }
    };
    Err(ChatError::permission_denied(reason))
}

pub fn ensure_can_remove_participant(
    actor: Uuid,
    chat: &Chat,
    target: Uuid,
    project: Option<&ProjectRef>,
) -> Result<(), ChatError> {
    if can_remove_participant(actor, chat, target, project) {
        return Ok(());
    }
    let reason = if !chat.is_participant(actor) {
        "not a participant of this chat"
    } else if !chat.is_participant(target) {
        "target user is not a participant of this chat"
    } else {
        match chat.chat_type {
            ChatType::Direct => "direct chats cannot be modified",
            ChatType::Group => {
                if chat.is_admin(actor) {
                    "cannot remove the last remaining admin"
                } else {
                    "only group admins may remove participants"
                }
            }
            ChatType::Project => "the project owner cannot be removed from the project chat",
        }
    };
    Err(ChatError::permission_denied(reason))
}

pub fn ensure_can_leave_chat(user_id: Uuid, chat: &Chat) -> Result<(), ChatError> {
    if can_leave_chat(user_id, chat) {
        return Ok(());
    }
    let reason = if !chat.is_participant(user_id) {
        "not a participant of this chat"
    } else {
        match chat.chat_type {
            ChatType::Direct => "direct chats cannot be left",
            _ => "the last remaining admin cannot leave the group",
        }
    };
    Err(ChatError::permission_denied(reason))
}

pub fn ensure_can_rename_group(actor: Uuid, chat: &Chat) -> Result<(), ChatError> {
    if can_rename_group(actor, chat) {
        Ok(())
    } else if chat.chat_type != ChatType::Group {
        Err(ChatError::permission_denied("only group chats can be renamed"))
    } else {
        Err(ChatError::permission_denied(
            "only group admins may rename the chat",
        ))
    }
}

pub fn ensure_can_view_messages(user_id: Uuid, chat: &Chat) -> Result<(), ChatError> {
    if can_view_messages(user_id, chat) {
        Ok(())
    } else {
        Err(ChatError::permission_denied("not a participant of this chat"))
    }
}
