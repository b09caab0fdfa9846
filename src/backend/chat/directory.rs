//! Chat Directory
//!
//! Owns chat lifecycle on top of the persistence port: create-or-reuse,
//! participant management, renaming, listing, and read markers. Every
//! mutation re-validates the relevant authorization rule immediately before
//! persisting, so the REST surface and the socket gateway share one
//! membership decision path.
//!
//! Concurrency notes:
//!
//! - `create_or_get_direct_chat` is idempotent under concurrency. The store
//!   enforces uniqueness on the sorted user pair; on a create conflict the
//!   directory rechecks the lookup and converges on the winner.
//! - All participant mutations are last-write-wins at the storage layer.
//!   Participant lists are small and conflicts rare; idempotence (no silent
//!   duplication, explicit "already a participant" failure) is the contract
//!   instead of optimistic locking.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::backend::chat::projects::ProjectProvider;
use crate::backend::chat::rules;
use crate::backend::chat::store::ChatStore;
use crate::shared::chat::{
    Chat, ChatType, Participant, ParticipantRole, MAX_GROUP_TITLE_LEN,
};
use crate::shared::error::ChatError;
use crate::shared::project::ProjectRef;

/// Default page size for `list_for_user`
pub const DEFAULT_LIST_LIMIT: usize = 50;

/// Hard cap on the `list_for_user` page size
pub const MAX_LIST_LIMIT: usize = 100;

/// Clamp a requested page size to `[1, MAX_LIST_LIMIT]`, defaulting when absent
pub fn clamp_limit(limit: Option<usize>) -> usize {
    limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT)
}

/// Chat lifecycle service
pub struct ChatDirectory {
    chats: Arc<dyn ChatStore>,
    projects: Arc<dyn ProjectProvider>,
}

impl ChatDirectory {
    pub fn new(chats: Arc<dyn ChatStore>, projects: Arc<dyn ProjectProvider>) -> Self {
        Self { chats, projects }
    }

    /// Find or create the direct chat for an unordered user pair
    ///
    /// Concurrent calls with the same pair, in either argument order,
    /// converge to a single chat.
    pub async fn create_or_get_direct_chat(
        &self,
        initiator: Uuid,
        peer: Uuid,
    ) -> Result<Chat, ChatError> {
        rules::ensure_can_create_direct_chat(initiator, peer)?;

        if let Some(existing) = self.chats.find_direct_by_members(initiator, peer).await? {
            return Ok(existing);
        }

        let chat = Chat::new(
            ChatType::Direct,
            None,
            None,
            vec![
                Participant::new(initiator, ParticipantRole::Member),
                Participant::new(peer, ParticipantRole::Member),
            ],
        );

        match self.chats.create(chat).await {
            Ok(created) => {
                tracing::info!("[Directory] Created direct chat {}", created.id);
                Ok(created)
            }
            // Lost the create race: recheck and converge on the winner.
            Err(err) => match self.chats.find_direct_by_members(initiator, peer).await? {
                Some(existing) => {
                    tracing::debug!(
                        "[Directory] Direct chat create raced, reusing {}",
                        existing.id
                    );
                    Ok(existing)
                }
                None => Err(err),
            },
        }
    }

    /// Find or create the single chat bound to a project
    ///
    /// On creation the current project team is snapshotted as the initial
    /// participant list: owner as admin, everyone else a member,
    /// de-duplicated. The snapshot is not kept in sync with later team
    /// changes; those arrive through explicit add/remove calls.
    pub async fn create_or_get_project_chat(
        &self,
        initiator: Uuid,
        project_id: Uuid,
    ) -> Result<Chat, ChatError> {
        let project = self
            .projects
            .find_by_id(project_id)
            .await?
            .ok_or_else(|| ChatError::not_found("project", project_id))?;
        rules::ensure_can_create_project_chat(initiator, &project)?;

        if let Some(existing) = self.chats.find_project_chat(project_id).await? {
            return Ok(existing);
        }

        let participants = project
            .members()
            .into_iter()
            .map(|user_id| {
                let role = if project.is_owner(user_id) {
                    ParticipantRole::Admin
                } else {
                    ParticipantRole::Member
                };
                Participant::new(user_id, role)
            })
            .collect();

        let chat = Chat::new(
            ChatType::Project,
            Some(project_id),
            Some(project.name.clone()),
            participants,
        );
        let created = self.chats.create(chat).await?;
        tracing::info!(
            "[Directory] Created project chat {} for project {}",
            created.id,
            project_id
        );
        Ok(created)
    }

    /// Create a group chat with the initiator as admin
    pub async fn create_group_chat(
        &self,
        initiator: Uuid,
        title: &str,
        member_ids: &[Uuid],
    ) -> Result<Chat, ChatError> {
        let title = validate_group_title(title)?;
        rules::ensure_can_create_group_chat(initiator, member_ids)?;

        let mut participants = vec![Participant::new(initiator, ParticipantRole::Admin)];
        for &member in member_ids {
            if participants.iter().all(|p| p.user_id != member) {
                participants.push(Participant::new(member, ParticipantRole::Member));
            }
        }

        let chat = Chat::new(ChatType::Group, None, Some(title), participants);
        let created = self.chats.create(chat).await?;
        tracing::info!(
            "[Directory] Created group chat {} with {} participants",
            created.id,
            created.participants.len()
        );
        Ok(created)
    }

    /// Chats the user participates in, most recently updated first
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<Vec<Chat>, ChatError> {
        self.chats
            .list_by_user(user_id, clamp_limit(limit), offset.unwrap_or(0))
            .await
    }

    /// Load a chat, enforcing membership
    ///
    /// `NotFound` if the chat does not exist, `PermissionDenied` if the
    /// caller is not a participant. The gateway uses this as the
    /// authoritative membership gate at message-send time.
    pub async fn get_by_id(&self, chat_id: Uuid, user_id: Uuid) -> Result<Chat, ChatError> {
        let chat = self
            .chats
            .find_by_id(chat_id)
            .await?
            .ok_or_else(|| ChatError::not_found("chat", chat_id))?;
        rules::ensure_can_view_messages(user_id, &chat)?;
        Ok(chat)
    }

    /// Add a user to a chat
    ///
    /// Adding an existing participant fails with an explicit validation
    /// error rather than silently duplicating the record. The actor's own
    /// membership is checked before anything about the target, so callers
    /// outside the chat cannot probe who is in it.
    pub async fn add_participant(
        &self,
        actor: Uuid,
        chat_id: Uuid,
        target: Uuid,
    ) -> Result<Chat, ChatError> {
        let chat = self.load(chat_id).await?;
        rules::ensure_can_view_messages(actor, &chat)?;
        if chat.is_participant(target) {
            return Err(ChatError::validation("user_id", "user is already a participant"));
        }
        let project = self.project_for(&chat).await?;
        rules::ensure_can_add_participant(actor, &chat, target, project.as_ref())?;

        let role = match (&project, chat.chat_type) {
            (Some(p), ChatType::Project) if p.is_owner(target) => ParticipantRole::Admin,
            _ => ParticipantRole::Member,
        };
        let updated = self
            .chats
            .add_participant(chat_id, Participant::new(target, role))
            .await?;
        tracing::info!("[Directory] Added {} to chat {}", target, chat_id);
        Ok(updated)
    }

    /// Remove a user from a chat
    ///
    /// Participant-NotFound is only surfaced to callers who are themselves
    /// in the chat; outsiders get `PermissionDenied` regardless of target.
    pub async fn remove_participant(
        &self,
        actor: Uuid,
        chat_id: Uuid,
        target: Uuid,
    ) -> Result<Chat, ChatError> {
        let chat = self.load(chat_id).await?;
        rules::ensure_can_view_messages(actor, &chat)?;
        if !chat.is_participant(target) {
            return Err(ChatError::not_found("participant", target));
        }
        let project = self.project_for(&chat).await?;
        rules::ensure_can_remove_participant(actor, &chat, target, project.as_ref())?;

        let updated = self.chats.remove_participant(chat_id, target).await?;
        tracing::info!("[Directory] Removed {} from chat {}", target, chat_id);
        Ok(updated)
    }

    /// Leave a chat voluntarily
    pub async fn leave_chat(&self, user_id: Uuid, chat_id: Uuid) -> Result<Chat, ChatError> {
        let chat = self.load(chat_id).await?;
        rules::ensure_can_leave_chat(user_id, &chat)?;
        let updated = self.chats.remove_participant(chat_id, user_id).await?;
        tracing::info!("[Directory] {} left chat {}", user_id, chat_id);
        Ok(updated)
    }

    /// Rename a group chat
    pub async fn rename_group(
        &self,
        actor: Uuid,
        chat_id: Uuid,
        title: &str,
    ) -> Result<Chat, ChatError> {
        let mut chat = self.load(chat_id).await?;
        rules::ensure_can_rename_group(actor, &chat)?;
        chat.title = Some(validate_group_title(title)?);
        chat.updated_at = Utc::now();
        self.chats.update(chat).await
    }

    /// Update the caller's read marker
    ///
    /// Does not bump `updated_at`; reading is not a conversation update.
    pub async fn mark_read(
        &self,
        user_id: Uuid,
        chat_id: Uuid,
        at: Option<DateTime<Utc>>,
    ) -> Result<Chat, ChatError> {
        let mut chat = self.load(chat_id).await?;
        let marker = at.unwrap_or_else(Utc::now);
        let participant = chat
            .participants
            .iter_mut()
            .find(|p| p.user_id == user_id)
            .ok_or_else(|| ChatError::permission_denied("not a participant of this chat"))?;
        participant.last_read_at = Some(marker);
        self.chats.update(chat).await
    }

    async fn load(&self, chat_id: Uuid) -> Result<Chat, ChatError> {
        self.chats
            .find_by_id(chat_id)
            .await?
            .ok_or_else(|| ChatError::not_found("chat", chat_id))
    }

    /// Resolve the project snapshot for project chats, `None` otherwise
    async fn project_for(&self, chat: &Chat) -> Result<Option<ProjectRef>, ChatError> {
        match (chat.chat_type, chat.project_id) {
            (ChatType::Project, Some(project_id)) => self.projects.find_by_id(project_id).await,
            _ => Ok(None),
        }
    }
}

fn validate_group_title(title: &str) -> Result<String, ChatError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ChatError::validation("title", "title must not be empty"));
    }
    if trimmed.chars().count() > MAX_GROUP_TITLE_LEN {
        return Err(ChatError::validation(
            "title",
            format!("title exceeds {} characters", MAX_GROUP_TITLE_LEN),
        ));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::chat::projects::InMemoryProjectProvider;
    use crate::backend::chat::store::InMemoryChatStore;

    fn directory() -> (ChatDirectory, Arc<InMemoryProjectProvider>) {
        let projects = Arc::new(InMemoryProjectProvider::new());
        let dir = ChatDirectory::new(Arc::new(InMemoryChatStore::new()), projects.clone());
        (dir, projects)
    }

    #[test]
    fn test_limit_clamping() {
        assert_eq!(clamp_limit(None), DEFAULT_LIST_LIMIT);
        assert_eq!(clamp_limit(Some(10)), 10);
        assert_eq!(clamp_limit(Some(0)), 1);
        assert_eq!(clamp_limit(Some(1000)), MAX_LIST_LIMIT);
    }

    #[test]
    fn test_title_validation() {
        assert_eq!(validate_group_title("  crew  ").unwrap(), "crew");
        assert!(validate_group_title("   ").is_err());
        assert!(validate_group_title(&"x".repeat(MAX_GROUP_TITLE_LEN + 1)).is_err());
    }

    #[tokio::test]
    async fn test_direct_chat_reused_in_both_orders() {
        let (dir, _) = directory();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        let first = dir.create_or_get_direct_chat(a, b).await.unwrap();
        let second = dir.create_or_get_direct_chat(b, a).await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(first.participants.len(), 2);
    }

    #[tokio::test]
    async fn test_project_chat_snapshots_team_once() {
        let (dir, projects) = directory();
        let owner = Uuid::new_v4();
        let worker = Uuid::new_v4();
        let project = ProjectRef {
            id: Uuid::new_v4(),
            name: "South wing".to_string(),
            owner_id: owner,
            team: vec![worker, owner],
        };
        projects.insert(project.clone()).await;

        let chat = dir
            .create_or_get_project_chat(worker, project.id)
            .await
            .unwrap();
        assert_eq!(chat.chat_type, ChatType::Project);
        assert_eq!(chat.title.as_deref(), Some("South wing"));
        assert_eq!(chat.participants.len(), 2);
        assert!(chat.is_admin(owner));
        assert!(!chat.is_admin(worker));

        // Second call reuses, even after the team changed upstream.
        let mut grown = project.clone();
        grown.team.push(Uuid::new_v4());
        projects.insert(grown).await;
        let again = dir
            .create_or_get_project_chat(owner, project.id)
            .await
            .unwrap();
        assert_eq!(again.id, chat.id);
        assert_eq!(again.participants.len(), 2);
    }

    #[tokio::test]
    async fn test_group_chat_roles() {
        let (dir, _) = directory();
        let initiator = Uuid::new_v4();
        let members = vec![Uuid::new_v4(), Uuid::new_v4()];

        let chat = dir
            .create_group_chat(initiator, "Night shift", &members)
            .await
            .unwrap();
        assert!(chat.is_admin(initiator));
        assert_eq!(chat.admin_count(), 1);
        assert_eq!(chat.participants.len(), 3);
    }

    #[tokio::test]
    async fn test_add_existing_participant_is_explicit_failure() {
        let (dir, _) = directory();
        let admin = Uuid::new_v4();
        let member = Uuid::new_v4();
        let chat = dir
            .create_group_chat(admin, "crew", &[member])
            .await
            .unwrap();

        let err = dir.add_participant(admin, chat.id, member).await.unwrap_err();
        assert!(matches!(err, ChatError::Validation { .. }));
        let reloaded = dir.get_by_id(chat.id, admin).await.unwrap();
        assert_eq!(reloaded.participants.len(), 2);
    }

    #[tokio::test]
    async fn test_outsider_cannot_probe_membership() {
        let (dir, _) = directory();
        let admin = Uuid::new_v4();
        let member = Uuid::new_v4();
        let chat = dir
            .create_group_chat(admin, "crew", &[member])
            .await
            .unwrap();
        let outsider = Uuid::new_v4();

        // An outsider adding an existing member must not learn that the
        // membership already exists.
        let err = dir.add_participant(outsider, chat.id, member).await.unwrap_err();
        assert!(matches!(err, ChatError::PermissionDenied { .. }));

        // Nor may removal reveal whether an arbitrary user is inside.
        let err = dir
            .remove_participant(outsider, chat.id, member)
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::PermissionDenied { .. }));
        let err = dir
            .remove_participant(outsider, chat.id, Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::PermissionDenied { .. }));

        // Participants still get the precise answers.
        let err = dir
            .remove_participant(admin, chat.id, Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_get_by_id_failure_modes() {
        let (dir, _) = directory();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let chat = dir.create_or_get_direct_chat(a, b).await.unwrap();

        assert!(matches!(
            dir.get_by_id(Uuid::new_v4(), a).await,
            Err(ChatError::NotFound { .. })
        ));
        assert!(matches!(
            dir.get_by_id(chat.id, Uuid::new_v4()).await,
            Err(ChatError::PermissionDenied { .. })
        ));
        assert_eq!(dir.get_by_id(chat.id, a).await.unwrap().id, chat.id);
    }

    #[tokio::test]
    async fn test_mark_read_sets_marker_without_reordering() {
        let (dir, _) = directory();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let chat = dir.create_or_get_direct_chat(a, b).await.unwrap();
        let before = chat.updated_at;

        let updated = dir.mark_read(a, chat.id, None).await.unwrap();
        assert!(updated.participant(a).unwrap().last_read_at.is_some());
        assert!(updated.participant(b).unwrap().last_read_at.is_none());
        assert_eq!(updated.updated_at, before);
    }
}
