// SPDX-License-Identifier: MIT

//! [`ActivityMonitor`]: periodic liveness + activity classification loop
//! (spec §4.7).

use crate::config::EngineConfig;
use crate::member_lock::MemberLocks;
use amx_adapters::SessionAdapter;
use amx_core::clock::Clock;
use amx_core::status::{AgentStatus, WorkingStatus};
use amx_storage::Storage;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

pub struct ActivityMonitor<A: SessionAdapter, C: Clock> {
    storage: Arc<Storage>,
    sessions: Arc<A>,
    clock: C,
    config: EngineConfig,
    member_locks: Arc<MemberLocks>,
}

impl<A: SessionAdapter, C: Clock> ActivityMonitor<A, C> {
    pub fn new(storage: Arc<Storage>, sessions: Arc<A>, clock: C, config: EngineConfig, member_locks: Arc<MemberLocks>) -> Arc<Self> {
        Arc::new(Self {
            storage,
            sessions,
            clock,
            config,
            member_locks,
        })
    }

    /// Spawn the periodic ticker as a long-lived background task (spec §5:
    /// "one activity-monitor ticker").
    pub fn spawn(self: &Arc<Self>) -> JoinHandle<()> {
        let monitor = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(monitor.config.activity_poll_interval);
            loop {
                interval.tick().await;
                monitor.poll_once().await;
            }
        })
    }

    /// Run one pass over every active member across every team (spec
    /// §4.7). Inactive members are skipped without a capture call.
    pub async fn poll_once(&self) {
        for team in self.storage.list_teams() {
            let mut changed = false;
            let mut team = team;
            for member in team.members.clone() {
                if member.agent_status != AgentStatus::Active || member.session_name.is_empty() {
                    continue;
                }
                let _guard = self.member_locks.acquire(&member.id).await;
                if let Some(current) = team.member_mut(member.id.as_str()) {
                    if self.poll_member(current).await {
                        changed = true;
                    }
                }
            }
            if changed {
                if let Err(e) = self.storage.save_team(&team) {
                    warn!(error = %e, team = %team.id, "failed to persist activity monitor update");
                }
            }
        }
    }

    /// Returns `true` if the member's status changed.
    async fn poll_member(&self, member: &mut amx_core::TeamMember) -> bool {
        let session_name = member.session_name.clone();
        match self.sessions.exists(&session_name).await {
            Ok(false) => {
                member.agent_status = AgentStatus::Inactive;
                member.working_status = WorkingStatus::Idle;
                member.last_terminal_output = None;
                member.last_activity_check = Some(self.clock.now());
                true
            }
            Ok(true) => {
                let capture = self
                    .sessions
                    .capture_pane(&session_name, self.config.activity_capture_lines)
                    .await
                    .unwrap_or_default();
                let changed_output = !capture.is_empty() && Some(&capture) != member.last_terminal_output.as_ref();
                member.working_status = if changed_output { WorkingStatus::InProgress } else { WorkingStatus::Idle };
                member.last_terminal_output = Some(capture);
                member.last_activity_check = Some(self.clock.now());
                debug!(session = %session_name, working_status = %member.working_status, "activity poll");
                true
            }
            Err(e) => {
                warn!(session = %session_name, error = %e, "activity poll failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amx_adapters::session::FakeSessionAdapter;
    use amx_core::clock::FakeClock;
    use amx_core::member::TeamMember;
    use amx_core::role::Role;
    use amx_core::team::{Team, TeamId};
    use amx_core::MemberId;
    use amx_storage::StoragePaths;
    use std::path::Path;

    fn setup(dir: &tempfile::TempDir) -> (Arc<ActivityMonitor<FakeSessionAdapter, FakeClock>>, Arc<Storage>, Arc<FakeSessionAdapter>, FakeClock) {
        let storage = Arc::new(Storage::open(StoragePaths::at(dir.path())).unwrap());
        let sessions = Arc::new(FakeSessionAdapter::new());
        let clock = FakeClock::default();
        let monitor = ActivityMonitor::new(storage.clone(), sessions.clone(), clock.clone(), EngineConfig::default(), Arc::new(MemberLocks::new()));
        (monitor, storage, sessions, clock)
    }

    #[tokio::test]
    async fn dead_session_flips_member_to_inactive_and_idle() {
        let dir = tempfile::tempdir().unwrap();
        let (monitor, storage, _sessions, clock) = setup(&dir);
        let mut member = TeamMember::new(MemberId::new("m1"), "dev-a", Role::Developer, "", &clock);
        member.mark_session("alpha-dev-a", &clock);
        member.mark_active(&clock);
        let team = Team::new(TeamId::new("t1"), "Alpha", "", vec![member], &clock);
        storage.save_team(&team).unwrap();

        monitor.poll_once().await;

        let team = storage.get_team(&TeamId::new("t1")).unwrap();
        let member = team.member("m1").unwrap();
        assert_eq!(member.agent_status, AgentStatus::Inactive);
        assert_eq!(member.working_status, WorkingStatus::Idle);
    }

    #[tokio::test]
    async fn changed_output_marks_in_progress() {
        let dir = tempfile::tempdir().unwrap();
        let (monitor, storage, sessions, clock) = setup(&dir);
        sessions.create("alpha-dev-a", Path::new("/tmp/p"), "developer").await.unwrap();
        sessions.set_output("alpha-dev-a", vec!["new output".to_string()]);

        let mut member = TeamMember::new(MemberId::new("m1"), "dev-a", Role::Developer, "", &clock);
        member.mark_session("alpha-dev-a", &clock);
        member.mark_active(&clock);
        let team = Team::new(TeamId::new("t1"), "Alpha", "", vec![member], &clock);
        storage.save_team(&team).unwrap();

        monitor.poll_once().await;

        let team = storage.get_team(&TeamId::new("t1")).unwrap();
        let member = team.member("m1").unwrap();
        assert_eq!(member.working_status, WorkingStatus::InProgress);
        assert_eq!(member.last_terminal_output.as_deref(), Some("new output"));
    }

    #[tokio::test]
    async fn unchanged_output_is_idle() {
        let dir = tempfile::tempdir().unwrap();
        let (monitor, storage, sessions, clock) = setup(&dir);
        sessions.create("alpha-dev-a", Path::new("/tmp/p"), "developer").await.unwrap();
        sessions.set_output("alpha-dev-a", vec!["same".to_string()]);

        let mut member = TeamMember::new(MemberId::new("m1"), "dev-a", Role::Developer, "", &clock);
        member.mark_session("alpha-dev-a", &clock);
        member.mark_active(&clock);
        member.last_terminal_output = Some("same".to_string());
        let team = Team::new(TeamId::new("t1"), "Alpha", "", vec![member], &clock);
        storage.save_team(&team).unwrap();

        monitor.poll_once().await;

        let team = storage.get_team(&TeamId::new("t1")).unwrap();
        assert_eq!(team.member("m1").unwrap().working_status, WorkingStatus::Idle);
    }

    #[tokio::test]
    async fn inactive_members_are_skipped_without_capture_call() {
        let dir = tempfile::tempdir().unwrap();
        let (monitor, storage, sessions, clock) = setup(&dir);
        let member = TeamMember::new(MemberId::new("m1"), "dev-a", Role::Developer, "", &clock);
        let team = Team::new(TeamId::new("t1"), "Alpha", "", vec![member], &clock);
        storage.save_team(&team).unwrap();

        monitor.poll_once().await;
        assert!(sessions.calls().is_empty());
    }
}
