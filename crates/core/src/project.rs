// SPDX-License-Identifier: MIT

//! [`Project`]: a path on disk plus the teams assigned to it, keyed by role
//! (spec §3).

use crate::clock::Clock;
use crate::role::Role;
use crate::status::ProjectStatus;
use crate::team::TeamId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

crate::define_id! {
    /// Unique identifier for a project.
    pub struct ProjectId;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub path: PathBuf,
    /// Role key -> ordered sequence of team ids assigned to that role.
    #[serde(default)]
    pub teams: HashMap<Role, Vec<TeamId>>,
    #[serde(default)]
    pub status: ProjectStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn new(id: ProjectId, name: impl Into<String>, path: PathBuf, clock: &impl Clock) -> Self {
        let now = clock.now();
        Self {
            id,
            name: name.into(),
            path,
            teams: HashMap::new(),
            status: ProjectStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    /// The `.agentmux/` runtime subtree under the project path (spec §6).
    pub fn agentmux_dir(&self) -> PathBuf {
        self.path.join(".agentmux")
    }

    pub fn tasks_dir(&self) -> PathBuf {
        self.agentmux_dir().join("tasks")
    }

    pub fn specs_dir(&self) -> PathBuf {
        self.agentmux_dir().join("specs")
    }

    /// Invariant from spec §3: path must resolve to a readable directory.
    pub fn path_is_resolvable(&self) -> bool {
        resolves_to_readable_dir(&self.path)
    }

    pub fn assign_team(&mut self, role: Role, team_id: TeamId, clock: &impl Clock) {
        self.teams.entry(role).or_default().push(team_id);
        self.updated_at = clock.now();
    }

    pub fn all_team_ids(&self) -> Vec<TeamId> {
        self.teams.values().flatten().cloned().collect()
    }
}

fn resolves_to_readable_dir(path: &Path) -> bool {
    path.is_dir() && std::fs::read_dir(path).is_ok()
}
