// SPDX-License-Identifier: MIT

//! [`InProgressTask`]: the Task Registry's per-assignment entry (spec §3, §4.4).

use crate::clock::Clock;
use crate::project::ProjectId;
use crate::role::Role;
use crate::status::RegistryStatus;
use crate::task_frontmatter::Priority;
use crate::MemberId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

crate::define_id! {
    /// Unique identifier for a task registry entry.
    pub struct RegistryEntryId;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InProgressTask {
    pub id: RegistryEntryId,
    pub project_id: ProjectId,
    /// Links the registry entry to the task file's current path. Invariant
    /// (spec §4.4): no two entries share `task_file_path`.
    pub task_file_path: PathBuf,
    pub task_name: String,
    pub target_role: Role,
    pub assigned_member_id: Option<MemberId>,
    pub assigned_session_id: Option<String>,
    pub assigned_at: DateTime<Utc>,
    pub status: RegistryStatus,
    pub block_reason: Option<String>,
    #[serde(default)]
    pub priority: Priority,
}

impl InProgressTask {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: RegistryEntryId,
        project_id: ProjectId,
        task_file_path: PathBuf,
        task_name: impl Into<String>,
        target_role: Role,
        assigned_member_id: Option<MemberId>,
        assigned_session_id: Option<String>,
        priority: Priority,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id,
            project_id,
            task_file_path,
            task_name: task_name.into(),
            target_role,
            assigned_member_id,
            assigned_session_id,
            assigned_at: clock.now(),
            status: RegistryStatus::Assigned,
            block_reason: None,
            priority,
        }
    }

    /// True when this entry was created by `syncWithFileSystem` for an
    /// orphaned `in_progress/` file with no matching registry entry
    /// (spec §4.4).
    pub fn is_orphan(&self) -> bool {
        matches!(self.status, RegistryStatus::PendingAssignment)
    }
}
