// SPDX-License-Identifier: MIT

//! [`ScheduledMessage`]: single-fire or recurring prompt delivery (spec §3, §4.5).

use crate::clock::Clock;
use crate::project::ProjectId;
use crate::team::TeamId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

crate::define_id! {
    /// Unique identifier for a scheduled message.
    pub struct ScheduledMessageId;
}

/// Unit for a [`Delay`] amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DelayUnit {
    Seconds,
    Minutes,
    Hours,
}

/// An amount + unit delay, convertible to a [`Duration`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delay {
    pub amount: u64,
    pub unit: DelayUnit,
}

impl Delay {
    pub fn new(amount: u64, unit: DelayUnit) -> Self {
        Self { amount, unit }
    }

    pub fn minutes(amount: u64) -> Self {
        Self::new(amount, DelayUnit::Minutes)
    }

    pub fn to_duration(&self) -> Duration {
        match self.unit {
            DelayUnit::Seconds => Duration::from_secs(self.amount),
            DelayUnit::Minutes => Duration::from_secs(self.amount * 60),
            DelayUnit::Hours => Duration::from_secs(self.amount * 3600),
        }
    }
}

/// The resolved target of a scheduled message: a team (fans out to every
/// member's session) or the literal orchestrator session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScheduleTarget {
    Team(TeamId),
    Orchestrator,
    /// A literal session name, resolved directly without a team/role
    /// lookup (spec §4.5 `scheduleCheck`).
    Session(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledMessage {
    pub id: ScheduledMessageId,
    pub name: String,
    pub target: ScheduleTarget,
    pub target_project: Option<ProjectId>,
    pub message: String,
    pub delay: Delay,
    pub recurring: bool,
    pub active: bool,
    pub last_run: Option<DateTime<Utc>>,
    pub next_run: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ScheduledMessage {
    pub fn new(
        id: ScheduledMessageId,
        name: impl Into<String>,
        target: ScheduleTarget,
        message: impl Into<String>,
        delay: Delay,
        recurring: bool,
        clock: &impl Clock,
    ) -> Self {
        let now = clock.now();
        let next_run = now + chrono::Duration::from_std(delay.to_duration()).unwrap_or_default();
        Self {
            id,
            name: name.into(),
            target,
            target_project: None,
            message: message.into(),
            delay,
            recurring,
            active: true,
            last_run: None,
            next_run: Some(next_run),
            created_at: now,
            updated_at: now,
        }
    }

    /// Invariant from spec §3: `next_run` advances by `delay` after each
    /// fire when recurring; cleared when deactivated.
    pub fn advance_after_fire(&mut self, clock: &impl Clock) {
        let now = clock.now();
        self.last_run = Some(now);
        if self.recurring && self.active {
            self.next_run = Some(now + chrono::Duration::from_std(self.delay.to_duration()).unwrap_or_default());
        } else {
            self.active = false;
            self.next_run = None;
        }
        self.updated_at = now;
    }

    pub fn deactivate(&mut self, clock: &impl Clock) {
        self.active = false;
        self.next_run = None;
        self.updated_at = clock.now();
    }
}
