// SPDX-License-Identifier: MIT

//! [`OrchestratorStatus`]: the singleton orchestrator session record (spec §3, §6).

use crate::clock::Clock;
use crate::status::{AgentStatus, WorkingStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The reserved session id for the orchestrator (spec §6). The core refuses
/// to stop or delete a session by this id outside of the dedicated
/// orchestrator lifecycle operations.
pub const ORCHESTRATOR_SESSION_ID: &str = "agentmux-orc";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorStatus {
    pub session_id: String,
    pub agent_status: AgentStatus,
    pub working_status: WorkingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrchestratorStatus {
    pub fn new(clock: &impl Clock) -> Self {
        let now = clock.now();
        Self {
            session_id: ORCHESTRATOR_SESSION_ID.to_string(),
            agent_status: AgentStatus::Inactive,
            working_status: WorkingStatus::Idle,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Default for OrchestratorStatus {
    fn default() -> Self {
        Self::new(&crate::clock::SystemClock)
    }
}
