// SPDX-License-Identifier: MIT

//! [`Scheduler`]: one long-lived task per scheduled message (spec §4.5,
//! §5 "one timer per scheduled message"). Each task sleeps until the
//! message's `next_run`, fires, and — if the message is still recurring
//! and active — re-arms itself with the new `next_run`. This serializes
//! fires for a given message id by construction: the next sleep is only
//! computed after the previous fire finished.

use crate::error::EngineError;
use amx_adapters::SessionAdapter;
use amx_core::clock::Clock;
use amx_core::delivery_log::{DeliveryLogId, MessageDeliveryLog};
use amx_core::id::IdGen;
use amx_core::orchestrator_status::ORCHESTRATOR_SESSION_ID;
use amx_core::scheduled_message::{Delay, ScheduleTarget, ScheduledMessage, ScheduledMessageId};
use amx_storage::Storage;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

pub struct Scheduler<A: SessionAdapter, C: Clock, G: IdGen + 'static> {
    storage: Arc<Storage>,
    sessions: Arc<A>,
    clock: C,
    id_gen: G,
    handles: Mutex<HashMap<String, JoinHandle<()>>>,
}

impl<A: SessionAdapter, C: Clock, G: IdGen + 'static> Scheduler<A, C, G> {
    pub fn new(storage: Arc<Storage>, sessions: Arc<A>, clock: C, id_gen: G) -> Arc<Self> {
        Arc::new(Self {
            storage,
            sessions,
            clock,
            id_gen,
            handles: Mutex::new(HashMap::new()),
        })
    }

    /// Re-arm a long-lived task for every currently-active message. Call
    /// once at daemon boot so in-flight schedules survive a restart.
    pub fn rearm_all(self: &Arc<Self>) {
        for message in self.storage.list_active_scheduled_messages() {
            self.arm(message.id);
        }
    }

    pub fn schedule_message(self: &Arc<Self>, message: ScheduledMessage) -> Result<ScheduledMessageId, EngineError> {
        let id = message.id.clone();
        self.storage.save_scheduled_message(&message)?;
        self.arm(id.clone());
        Ok(id)
    }

    pub fn cancel_message(&self, id: &ScheduledMessageId) -> Result<(), EngineError> {
        if let Some(handle) = self.handles.lock().remove(id.as_str()) {
            handle.abort();
        }
        if let Some(mut message) = self.storage.get_scheduled_message(id) {
            message.deactivate(&self.clock);
            self.storage.save_scheduled_message(&message)?;
        }
        Ok(())
    }

    pub fn schedule_check(self: &Arc<Self>, session: impl Into<String>, minutes: u64, text: impl Into<String>) -> Result<ScheduledMessageId, EngineError> {
        let message = ScheduledMessage::new(
            ScheduledMessageId::new(self.id_gen.next()),
            "check",
            ScheduleTarget::Session(session.into()),
            text,
            Delay::minutes(minutes),
            false,
            &self.clock,
        );
        self.schedule_message(message)
    }

    pub fn schedule_recurring_check(self: &Arc<Self>, session: impl Into<String>, interval_minutes: u64, text: impl Into<String>) -> Result<ScheduledMessageId, EngineError> {
        let message = ScheduledMessage::new(
            ScheduledMessageId::new(self.id_gen.next()),
            "recurring-check",
            ScheduleTarget::Session(session.into()),
            text,
            Delay::minutes(interval_minutes),
            true,
            &self.clock,
        );
        self.schedule_message(message)
    }

    pub fn schedule_default_checkins(self: &Arc<Self>, session: impl Into<String>, interval_minutes: u64) -> Result<ScheduledMessageId, EngineError> {
        self.schedule_recurring_check(session, interval_minutes, "Status check-in: what are you working on, and are you blocked?")
    }

    pub fn cancel_all_checks_for_session(&self, session: &str) -> Result<(), EngineError> {
        for message in self.storage.list_active_scheduled_messages() {
            if self.resolve_target(&message.target).iter().any(|s| s == session) {
                self.cancel_message(&message.id)?;
            }
        }
        Ok(())
    }

    /// Cancel every active message whose target is `team_id` directly, or
    /// whose target is one of the team's member sessions (spec §4.9
    /// `stopTeam`: "cancel all scheduled messages whose target is the
    /// team").
    pub fn cancel_all_for_team(&self, team_id: &amx_core::team::TeamId) -> Result<(), EngineError> {
        let member_sessions = self.storage.get_team(team_id).map(|t| t.session_names()).unwrap_or_default();
        for message in self.storage.list_active_scheduled_messages() {
            let targets_team = matches!(&message.target, ScheduleTarget::Team(t) if t == team_id);
            let targets_member_session = matches!(&message.target, ScheduleTarget::Session(s) if member_sessions.contains(s));
            if targets_team || targets_member_session {
                self.cancel_message(&message.id)?;
            }
        }
        Ok(())
    }

    fn arm(self: &Arc<Self>, id: ScheduledMessageId) {
        let scheduler = Arc::clone(self);
        let task_id = id.clone();
        let handle = tokio::spawn(async move {
            loop {
                let message = match scheduler.storage.get_scheduled_message(&task_id) {
                    Some(m) if m.active => m,
                    _ => return,
                };
                let now = scheduler.clock.now();
                let wait = message
                    .next_run
                    .map(|next| (next - now).to_std().unwrap_or_default())
                    .unwrap_or_default();
                tokio::time::sleep(wait).await;

                let still_active = scheduler.fire(&task_id).await;
                if !still_active {
                    return;
                }
            }
        });
        self.handles.lock().insert(id.as_str().to_string(), handle);
    }

    /// Fire one message, appending a delivery log entry per resolved
    /// session, and advance/deactivate it. Returns `true` if the task
    /// loop should keep running (message is still active and recurring).
    async fn fire(&self, id: &ScheduledMessageId) -> bool {
        let Some(mut message) = self.storage.get_scheduled_message(id) else {
            return false;
        };

        let targets = self.resolve_target(&message.target);
        if targets.is_empty() {
            warn!(message_id = %id, "scheduled message resolved to no sessions");
        }

        for session in &targets {
            let result = self.deliver(session, &message.message).await;
            let (success, error) = match result {
                Ok(()) => (true, None),
                Err(e) => {
                    error!(message_id = %id, session = %session, error = %e, "scheduled delivery failed");
                    (false, Some(e.to_string()))
                }
            };
            let log = MessageDeliveryLog::new(
                DeliveryLogId::new(self.id_gen.next()),
                id.clone(),
                message.name.clone(),
                session.clone(),
                message.message.clone(),
                self.clock.now(),
                success,
                error,
            );
            if let Err(e) = self.storage.append_delivery_log(&log) {
                error!(error = %e, "failed to append delivery log");
            }
        }

        message.advance_after_fire(&self.clock);
        let keep_going = message.active;
        if let Err(e) = self.storage.save_scheduled_message(&message) {
            error!(error = %e, "failed to persist scheduled message after fire");
        }
        info!(message_id = %id, recurring = message.recurring, "scheduled message fired");
        keep_going
    }

    async fn deliver(&self, session: &str, text: &str) -> Result<(), EngineError> {
        self.sessions.send_message(session, text).await?;
        self.sessions.send_key(session, "Enter").await?;
        Ok(())
    }

    fn resolve_target(&self, target: &ScheduleTarget) -> Vec<String> {
        match target {
            ScheduleTarget::Orchestrator => vec![ORCHESTRATOR_SESSION_ID.to_string()],
            ScheduleTarget::Session(name) => vec![name.clone()],
            ScheduleTarget::Team(team_id) => self
                .storage
                .get_team(team_id)
                .map(|team| team.session_names())
                .unwrap_or_default(),
        }
    }
}
