// SPDX-License-Identifier: MIT

//! [`TeamMember`]: identity, session binding, and dual status (spec §3).

use crate::clock::Clock;
use crate::role::Role;
use crate::status::{AgentStatus, WorkingStatus};
use crate::MemberId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single agent slot within a [`crate::Team`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: MemberId,
    pub name: String,
    pub role: Role,
    pub system_prompt: String,

    /// Empty until a session exists; filled on first successful create;
    /// cleared on stop.
    #[serde(default)]
    pub session_name: String,

    /// Registration state, owned by the Supervisor (C6).
    pub agent_status: AgentStatus,
    /// Working state, owned by the Activity Monitor (C7).
    pub working_status: WorkingStatus,

    #[serde(default)]
    pub capabilities: Vec<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub ready_at: Option<DateTime<Utc>>,
    pub last_activity_check: Option<DateTime<Utc>>,
    pub last_terminal_output: Option<String>,
}

impl TeamMember {
    pub fn new(id: MemberId, name: impl Into<String>, role: Role, system_prompt: impl Into<String>, clock: &impl Clock) -> Self {
        let now = clock.now();
        Self {
            id,
            name: name.into(),
            role,
            system_prompt: system_prompt.into(),
            session_name: String::new(),
            agent_status: AgentStatus::Inactive,
            working_status: WorkingStatus::Idle,
            capabilities: Vec::new(),
            created_at: now,
            updated_at: now,
            ready_at: None,
            last_activity_check: None,
            last_terminal_output: None,
        }
    }

    /// Legacy `status` field mirrors `agent_status` for readers (spec §3).
    pub fn legacy_status(&self) -> AgentStatus {
        self.agent_status
    }

    /// Invariant from spec §3: if `agent_status = Active` then `session_name`
    /// is non-empty. This does not check multiplexer liveness (that
    /// requires an I/O round trip); see `amx-engine::activity_monitor`.
    pub fn satisfies_active_invariant(&self) -> bool {
        self.agent_status != AgentStatus::Active || !self.session_name.is_empty()
    }

    pub fn mark_session(&mut self, session_name: impl Into<String>, clock: &impl Clock) {
        self.session_name = session_name.into();
        self.updated_at = clock.now();
    }

    pub fn clear_session(&mut self, clock: &impl Clock) {
        self.session_name.clear();
        self.agent_status = AgentStatus::Inactive;
        self.working_status = WorkingStatus::Idle;
        self.updated_at = clock.now();
    }

    pub fn mark_active(&mut self, clock: &impl Clock) {
        self.agent_status = AgentStatus::Active;
        self.ready_at = Some(clock.now());
        self.updated_at = clock.now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FakeClock;

    fn member(clock: &FakeClock) -> TeamMember {
        TeamMember::new(MemberId::new("m-1"), "dev-a", Role::Developer, "you are dev-a", clock)
    }

    #[test]
    fn new_member_starts_inactive_and_idle() {
        let clock = FakeClock::default();
        let m = member(&clock);
        assert_eq!(m.agent_status, AgentStatus::Inactive);
        assert_eq!(m.working_status, WorkingStatus::Idle);
        assert!(m.session_name.is_empty());
    }

    #[test]
    fn active_invariant_requires_session_name() {
        let clock = FakeClock::default();
        let mut m = member(&clock);
        assert!(m.satisfies_active_invariant());
        m.agent_status = AgentStatus::Active;
        assert!(!m.satisfies_active_invariant());
        m.mark_session("alpha-dev-a-12ab34cd", &clock);
        assert!(m.satisfies_active_invariant());
    }

    #[test]
    fn clear_session_resets_statuses() {
        let clock = FakeClock::default();
        let mut m = member(&clock);
        m.mark_session("alpha-dev-a-12ab34cd", &clock);
        m.mark_active(&clock);
        m.clear_session(&clock);
        assert!(m.session_name.is_empty());
        assert_eq!(m.agent_status, AgentStatus::Inactive);
        assert_eq!(m.working_status, WorkingStatus::Idle);
    }

    #[test]
    fn legacy_status_mirrors_agent_status() {
        let clock = FakeClock::default();
        let mut m = member(&clock);
        m.mark_active(&clock);
        assert_eq!(m.legacy_status(), m.agent_status);
    }
}
