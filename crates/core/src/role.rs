// SPDX-License-Identifier: MIT

//! The closed set of team-member roles and the dispatch table that replaces
//! the source's dynamic-dispatch-by-role pattern (spec §9 Design Notes).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// A team member's role. Closed enumeration — adding a role means adding a
/// variant here and a matching arm in [`RoleProfile::for_role`], not
/// threading a new string constant through the codebase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Orchestrator,
    Tpm,
    Pgm,
    Developer,
    FrontendDeveloper,
    BackendDeveloper,
    Qa,
    Tester,
    Designer,
}

impl Role {
    pub const ALL: [Role; 9] = [
        Role::Orchestrator,
        Role::Tpm,
        Role::Pgm,
        Role::Developer,
        Role::FrontendDeveloper,
        Role::BackendDeveloper,
        Role::Qa,
        Role::Tester,
        Role::Designer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Orchestrator => "orchestrator",
            Role::Tpm => "tpm",
            Role::Pgm => "pgm",
            Role::Developer => "developer",
            Role::FrontendDeveloper => "frontend-developer",
            Role::BackendDeveloper => "backend-developer",
            Role::Qa => "qa",
            Role::Tester => "tester",
            Role::Designer => "designer",
        }
    }

    pub fn parse(s: &str) -> Option<Role> {
        Role::ALL.into_iter().find(|r| r.as_str() == s)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-role defaults: system prompt template, check-in cadence, and whether
/// the role is exempt from the default scheduled check-in (only `tpm`,
/// which may run the file-gated workflow instead — spec §4.9).
#[derive(Debug, Clone)]
pub struct RoleProfile {
    pub role: Role,
    pub default_checkin_interval: Duration,
    pub exempt_from_default_checkin: bool,
}

impl RoleProfile {
    pub fn for_role(role: Role) -> RoleProfile {
        let (interval_minutes, exempt) = match role {
            Role::Orchestrator => (30, false),
            Role::Tpm => (15, true),
            Role::Pgm => (20, false),
            Role::Developer | Role::FrontendDeveloper | Role::BackendDeveloper => (15, false),
            Role::Qa | Role::Tester => (15, false),
            Role::Designer => (20, false),
        };
        RoleProfile {
            role,
            default_checkin_interval: Duration::from_secs(interval_minutes * 60),
            exempt_from_default_checkin: exempt,
        }
    }

    /// Default system prompt template for this role, to be filled in with
    /// project facts by the caller (mirrors the workflow engine's
    /// placeholder substitution in spec §4.8).
    pub fn default_system_prompt(&self, member_name: &str, project_path: &str) -> String {
        format!(
            "You are {name}, acting as {role} on the project at {path}. \
             Report progress by moving your assigned task file through \
             open -> in_progress -> done, and register yourself as active \
             as soon as you are ready to receive work.",
            name = member_name,
            role = self.role,
            path = project_path,
        )
    }
}
