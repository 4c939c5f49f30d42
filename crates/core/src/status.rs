// SPDX-License-Identifier: MIT

//! Status enumerations for the entity state machines in spec §3 / §4.9.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Registration state of a [`crate::TeamMember`], owned by the Supervisor (C6).
///
/// State machine: `Inactive -> Activating -> Active -> Inactive`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    Inactive,
    Activating,
    Active,
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentStatus::Inactive => write!(f, "inactive"),
            AgentStatus::Activating => write!(f, "activating"),
            AgentStatus::Active => write!(f, "active"),
        }
    }
}

/// Working state of a [`crate::TeamMember`], owned by the Activity Monitor (C7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkingStatus {
    Idle,
    InProgress,
}

impl fmt::Display for WorkingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkingStatus::Idle => write!(f, "idle"),
            WorkingStatus::InProgress => write!(f, "in_progress"),
        }
    }
}

/// Team status. State machine: `idle -> working -> {blocked, idle}`,
/// `terminated` is terminal and cascades session kills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamStatus {
    Idle,
    Working,
    Blocked,
    Terminated,
}

impl Default for TeamStatus {
    fn default() -> Self {
        TeamStatus::Idle
    }
}

impl TeamStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TeamStatus::Terminated)
    }
}

/// Project lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Active,
    Paused,
    Completed,
    Stopped,
}

impl Default for ProjectStatus {
    fn default() -> Self {
        ProjectStatus::Active
    }
}

/// On-disk task folder status. State machine: `open -> in_progress ->
/// {done, blocked}`; `blocked -> in_progress` is permitted on unblock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskFolderStatus {
    Open,
    InProgress,
    Done,
    Blocked,
}

impl TaskFolderStatus {
    pub fn folder_name(&self) -> &'static str {
        match self {
            TaskFolderStatus::Open => "open",
            TaskFolderStatus::InProgress => "in_progress",
            TaskFolderStatus::Done => "done",
            TaskFolderStatus::Blocked => "blocked",
        }
    }

    pub fn parse(name: &str) -> Option<TaskFolderStatus> {
        match name {
            "open" => Some(TaskFolderStatus::Open),
            "in_progress" => Some(TaskFolderStatus::InProgress),
            "done" => Some(TaskFolderStatus::Done),
            "blocked" => Some(TaskFolderStatus::Blocked),
            _ => None,
        }
    }

    pub const ALL: [TaskFolderStatus; 4] = [
        TaskFolderStatus::Open,
        TaskFolderStatus::InProgress,
        TaskFolderStatus::Done,
        TaskFolderStatus::Blocked,
    ];
}

impl fmt::Display for TaskFolderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.folder_name())
    }
}

/// Status of a [`crate::InProgressTask`] registry entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistryStatus {
    Assigned,
    Active,
    Blocked,
    PendingAssignment,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_folder_status_round_trips_through_name() {
        for status in TaskFolderStatus::ALL {
            assert_eq!(TaskFolderStatus::parse(status.folder_name()), Some(status));
        }
    }

    #[test]
    fn parse_rejects_unknown_folder_name() {
        assert_eq!(TaskFolderStatus::parse("archived"), None);
    }

    #[test]
    fn team_status_terminated_is_terminal() {
        assert!(TeamStatus::Terminated.is_terminal());
        assert!(!TeamStatus::Working.is_terminal());
    }

    #[test]
    fn agent_status_serde_is_snake_case() {
        assert_eq!(
            serde_json::to_string(&AgentStatus::Activating).unwrap(),
            "\"activating\""
        );
    }
}
