// SPDX-License-Identifier: MIT

//! The structured header of a task markdown file (spec §3, §4.3).
//!
//! The parser itself lives in `amx-tasks` (it needs filesystem context for
//! milestone/status folder scanning); this module owns just the shape of
//! the frontmatter and its defaulting rules so `amx-core` consumers don't
//! need to depend on the tasks crate to reason about a task's fields.

use crate::role::Role;
use serde::{Deserialize, Serialize};

/// Task priority. Defaults to `Medium` when absent from frontmatter
/// (spec §4.4 invariant).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl Priority {
    pub fn parse(s: &str) -> Option<Priority> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            _ => None,
        }
    }
}

/// Parsed task frontmatter fields (spec §3: "id, title, status, priority,
/// targetRole, dependencies, estimatedHours, milestoneId").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskFrontmatter {
    pub id: String,
    pub title: String,
    /// Free-text status label as written in frontmatter; the folder the
    /// file lives in is the source of truth for the actual state machine
    /// (spec §4.3), this field just mirrors what the author wrote.
    pub status: String,
    #[serde(default)]
    pub priority: Priority,
    pub target_role: Option<Role>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    pub estimated_hours: Option<f64>,
    pub milestone_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_defaults_to_medium() {
        assert_eq!(Priority::default(), Priority::Medium);
    }

    #[test]
    fn priority_parse_is_case_insensitive() {
        assert_eq!(Priority::parse("HIGH"), Some(Priority::High));
        assert_eq!(Priority::parse("bogus"), None);
    }
}
