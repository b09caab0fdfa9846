//! Project Snapshot
//!
//! The project service is an external collaborator; the chat core only needs
//! a read-only view of a project's owner and team to evaluate authorization
//! rules and to snapshot the initial participant list of a project chat.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Read-only view of a project, as consumed by the chat core
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectRef {
    pub id: Uuid,
    pub name: String,
    pub owner_id: Uuid,
    /// Team member ids, may or may not include the owner
    pub team: Vec<Uuid>,
}

impl ProjectRef {
    pub fn is_owner(&self, user_id: Uuid) -> bool {
        self.owner_id == user_id
    }

    pub fn is_team_member(&self, user_id: Uuid) -> bool {
        self.team.contains(&user_id)
    }

    /// Owner plus team, de-duplicated, owner first
    pub fn members(&self) -> Vec<Uuid> {
        let mut out = vec![self.owner_id];
        for &member in &self.team {
            if !out.contains(&member) {
                out.push(member);
            }
        }
        out
    }
}
