//! Project Provider Port
//!
//! The project service is external; the directory only needs to resolve a
//! project id into a `ProjectRef` snapshot when evaluating project-chat
//! rules or snapshotting the initial team.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::shared::error::ChatError;
use crate::shared::project::ProjectRef;

/// Read-only project lookup
#[async_trait]
pub trait ProjectProvider: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ProjectRef>, ChatError>;
}

/// In-memory project provider for the dev server and tests
#[derive(Default)]
pub struct InMemoryProjectProvider {
    projects: RwLock<HashMap<Uuid, ProjectRef>>,
}

impl InMemoryProjectProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, project: ProjectRef) {
        self.projects.write().await.insert(project.id, project);
    }
}

#[async_trait]
impl ProjectProvider for InMemoryProjectProvider {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ProjectRef>, ChatError> {
        Ok(self.projects.read().await.get(&id).cloned())
    }
}
