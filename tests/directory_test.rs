//! Directory integration tests: concurrent idempotence, listing order,
//! and the full participant lifecycle across chat types.

use std::sync::Arc;

use assert_matches::assert_matches;
use uuid::Uuid;

use sitelink::backend::chat::directory::ChatDirectory;
use sitelink::backend::chat::projects::InMemoryProjectProvider;
use sitelink::backend::chat::store::InMemoryChatStore;
use sitelink::shared::chat::{ChatType, ParticipantRole};
use sitelink::shared::error::ChatError;
use sitelink::shared::project::ProjectRef;

fn directory() -> (Arc<ChatDirectory>, Arc<InMemoryProjectProvider>) {
    let projects = Arc::new(InMemoryProjectProvider::new());
    let dir = Arc::new(ChatDirectory::new(
        Arc::new(InMemoryChatStore::new()),
        projects.clone(),
    ));
    (dir, projects)
}

#[tokio::test]
async fn test_concurrent_direct_creation_converges_on_one_chat() {
    let (dir, _) = directory();
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    // Same pair, opposite argument order, racing.
    let d1 = dir.clone();
    let d2 = dir.clone();
    let t1 = tokio::spawn(async move { d1.create_or_get_direct_chat(alice, bob).await });
    let t2 = tokio::spawn(async move { d2.create_or_get_direct_chat(bob, alice).await });

    let first = t1.await.unwrap().unwrap();
    let second = t2.await.unwrap().unwrap();
    assert_eq!(first.id, second.id);

    let listed = dir.list_for_user(alice, None, None).await.unwrap();
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn test_listing_orders_by_recent_activity() {
    let (dir, _) = directory();
    let alice = Uuid::new_v4();

    let older = dir
        .create_group_chat(alice, "First crew", &[Uuid::new_v4()])
        .await
        .unwrap();
    let newer = dir
        .create_or_get_direct_chat(alice, Uuid::new_v4())
        .await
        .unwrap();

    let listed = dir.list_for_user(alice, None, None).await.unwrap();
    assert_eq!(listed[0].id, newer.id);
    assert_eq!(listed[1].id, older.id);

    // A participant change bumps the group back to the top.
    dir.add_participant(alice, older.id, Uuid::new_v4())
        .await
        .unwrap();
    let listed = dir.list_for_user(alice, None, None).await.unwrap();
    assert_eq!(listed[0].id, older.id);

    // Pagination slices the same ordering.
    let page = dir.list_for_user(alice, Some(1), Some(1)).await.unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].id, newer.id);
}

#[tokio::test]
async fn test_group_lifecycle_end_to_end() {
    let (dir, _) = directory();
    let admin = Uuid::new_v4();
    let member = Uuid::new_v4();
    let chat = dir
        .create_group_chat(admin, "Steel fixers", &[member])
        .await
        .unwrap();
    assert_eq!(chat.chat_type, ChatType::Group);

    // Member cannot add; admin can.
    let newcomer = Uuid::new_v4();
    assert!(matches!(
        dir.add_participant(member, chat.id, newcomer).await,
        Err(ChatError::PermissionDenied { .. })
    ));
    let chat = dir.add_participant(admin, chat.id, newcomer).await.unwrap();
    assert_eq!(chat.participants.len(), 3);

    // Rename is admin-only.
    assert!(dir.rename_group(member, chat.id, "Rebar").await.is_err());
    let chat = dir.rename_group(admin, chat.id, "Rebar crew").await.unwrap();
    assert_eq!(chat.title.as_deref(), Some("Rebar crew"));

    // Members leave freely; the sole admin cannot.
    dir.leave_chat(newcomer, chat.id).await.unwrap();
    assert!(matches!(
        dir.leave_chat(admin, chat.id).await,
        Err(ChatError::PermissionDenied { .. })
    ));

    // Admin removes the remaining member but never the last admin.
    let chat = dir.remove_participant(admin, chat.id, member).await.unwrap();
    assert_eq!(chat.participants.len(), 1);
    assert!(matches!(
        dir.remove_participant(admin, chat.id, admin).await,
        Err(ChatError::PermissionDenied { .. })
    ));
}

#[tokio::test]
async fn test_group_participant_bounds_enforced() {
    let (dir, _) = directory();
    let initiator = Uuid::new_v4();

    assert!(matches!(
        dir.create_group_chat(initiator, "Solo", &[]).await,
        Err(ChatError::Validation { .. })
    ));

    let over_cap: Vec<Uuid> = (0..200).map(|_| Uuid::new_v4()).collect();
    assert!(matches!(
        dir.create_group_chat(initiator, "Everyone", &over_cap).await,
        Err(ChatError::Validation { .. })
    ));
}

#[tokio::test]
async fn test_project_chat_lifecycle() {
    let (dir, projects) = directory();
    let owner = Uuid::new_v4();
    let worker = Uuid::new_v4();
    let outsider = Uuid::new_v4();
    let project = ProjectRef {
        id: Uuid::new_v4(),
        name: "Harbour crane pad".to_string(),
        owner_id: owner,
        team: vec![worker],
    };
    projects.insert(project.clone()).await;

    // Outsiders cannot open the project chat.
    assert_matches!(
        dir.create_or_get_project_chat(outsider, project.id).await,
        Err(ChatError::PermissionDenied { .. })
    );
    // Unknown projects surface as NotFound.
    assert_matches!(
        dir.create_or_get_project_chat(owner, Uuid::new_v4()).await,
        Err(ChatError::NotFound { .. })
    );

    let chat = dir
        .create_or_get_project_chat(worker, project.id)
        .await
        .unwrap();
    assert_eq!(chat.project_id, Some(project.id));
    assert!(chat.is_admin(owner));

    // A user added to the team upstream can be reflected into the chat.
    let newcomer = Uuid::new_v4();
    let mut grown = project.clone();
    grown.team.push(newcomer);
    projects.insert(grown).await;
    let chat = dir.add_participant(worker, chat.id, newcomer).await.unwrap();
    assert!(chat.is_participant(newcomer));
    assert_eq!(
        chat.participant(newcomer).unwrap().role,
        ParticipantRole::Member
    );

    // The owner is never removable; workers may leave.
    assert!(matches!(
        dir.remove_participant(worker, chat.id, owner).await,
        Err(ChatError::PermissionDenied { .. })
    ));
    dir.leave_chat(worker, chat.id).await.unwrap();
}

#[tokio::test]
async fn test_direct_chats_reject_modification() {
    let (dir, _) = directory();
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    let chat = dir.create_or_get_direct_chat(alice, bob).await.unwrap();

    assert!(matches!(
        dir.add_participant(alice, chat.id, Uuid::new_v4()).await,
        Err(ChatError::PermissionDenied { .. })
    ));
    assert!(matches!(
        dir.leave_chat(alice, chat.id).await,
        Err(ChatError::PermissionDenied { .. })
    ));
    assert!(matches!(
        dir.rename_group(alice, chat.id, "nope").await,
        Err(ChatError::PermissionDenied { .. })
    ));
}
