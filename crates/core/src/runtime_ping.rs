// SPDX-License-Identifier: MIT

//! [`RuntimePing`]: a record of an agent's self-registration callback,
//! the oracle the Agent Supervisor consults for registration success
//! (spec §4.6, §6).

use crate::clock::Clock;
use crate::role::Role;
use crate::MemberId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimePing {
    pub role: Role,
    pub session_id: String,
    pub member_id: Option<MemberId>,
    pub status: String,
    pub received_at: DateTime<Utc>,
}

impl RuntimePing {
    pub fn new(role: Role, session_id: impl Into<String>, member_id: Option<MemberId>, status: impl Into<String>, clock: &impl Clock) -> Self {
        Self {
            role,
            session_id: session_id.into(),
            member_id,
            status: status.into(),
            received_at: clock.now(),
        }
    }

    /// True when `received_at` is within `window_secs` of `now` — the
    /// freshness window spec §4.6 gives as 60 seconds by default.
    pub fn is_fresh(&self, now: DateTime<Utc>, window_secs: i64) -> bool {
        (now - self.received_at).num_seconds().abs() <= window_secs
    }
}
