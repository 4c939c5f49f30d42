// SPDX-License-Identifier: MIT

//! [`Team`]: a named, ordered set of members bound to at most one project
//! at a time (spec §3).

use crate::clock::Clock;
use crate::member::TeamMember;
use crate::project::ProjectId;
use crate::status::TeamStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Unique identifier for a team.
    pub struct TeamId;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub description: String,
    /// Insertion-order significant for display only.
    pub members: Vec<TeamMember>,
    pub current_project: Option<ProjectId>,
    #[serde(default)]
    pub status: TeamStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Team {
    pub fn new(id: TeamId, name: impl Into<String>, description: impl Into<String>, members: Vec<TeamMember>, clock: &impl Clock) -> Self {
        let now = clock.now();
        Self {
            id,
            name: name.into(),
            description: description.into(),
            members,
            current_project: None,
            status: TeamStatus::Idle,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn member(&self, id: &str) -> Option<&TeamMember> {
        self.members.iter().find(|m| m.id.as_str() == id)
    }

    pub fn member_mut(&mut self, id: &str) -> Option<&mut TeamMember> {
        self.members.iter_mut().find(|m| m.id.as_str() == id)
    }

    pub fn session_names(&self) -> Vec<String> {
        self.members
            .iter()
            .filter(|m| !m.session_name.is_empty())
            .map(|m| m.session_name.clone())
            .collect()
    }
}
