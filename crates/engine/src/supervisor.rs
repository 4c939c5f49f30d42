// SPDX-License-Identifier: MIT

//! [`Supervisor`]: turns a [`TeamMember`] into a live, registered agent via
//! progressive escalation (spec §4.6).

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::member_lock::MemberLocks;
use amx_adapters::SessionAdapter;
use amx_core::clock::Clock;
use amx_core::id::ShortId;
use amx_core::orchestrator_status::ORCHESTRATOR_SESSION_ID;
use amx_core::role::{Role, RoleProfile};
use amx_core::status::AgentStatus;
use amx_core::team::TeamId;
use amx_core::{MemberId, RuntimePing};
use amx_storage::Storage;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Token the Supervisor looks for in a pane capture as secondary evidence
/// of registration, alongside a fresh runtime ping (spec §4.6).
pub const REGISTRATION_MARKER: &str = "AGENTMUX_REGISTERED";

const POLL_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct BatchOutcome {
    pub member_id: MemberId,
    pub session_name: Option<String>,
    pub message: Option<String>,
    pub error: Option<String>,
}

/// A live session plus which escalation step (spec §4.6) produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredSession {
    pub session_name: String,
    pub message: &'static str,
}

pub struct Supervisor<A: SessionAdapter, C: Clock> {
    storage: Arc<Storage>,
    sessions: Arc<A>,
    clock: C,
    config: EngineConfig,
    member_locks: Arc<MemberLocks>,
}

impl<A: SessionAdapter, C: Clock> Supervisor<A, C> {
    pub fn new(storage: Arc<Storage>, sessions: Arc<A>, clock: C, config: EngineConfig, member_locks: Arc<MemberLocks>) -> Arc<Self> {
        Arc::new(Self {
            storage,
            sessions,
            clock,
            config,
            member_locks,
        })
    }

    pub fn session_name_for(team_slug: &str, role: Role, short_id: &str) -> String {
        format!("{}-{}-{}", team_slug, role_slug(role), short_id)
    }

    /// Create the singleton orchestrator session, refusing a second one.
    pub async fn ensure_orchestrator(self: &Arc<Self>, project_path: &Path) -> Result<(), EngineError> {
        if self.sessions.exists(ORCHESTRATOR_SESSION_ID).await? {
            return Err(EngineError::Conflict("orchestrator session already exists".into()));
        }
        self.sessions.create_orchestrator(ORCHESTRATOR_SESSION_ID, project_path).await?;
        Ok(())
    }

    /// Run progressive escalation for one member: direct prompt, cleanup +
    /// reinit, full recreation, fail (spec §4.6 steps 1-4).
    pub async fn register_member(
        self: &Arc<Self>,
        team_id: &TeamId,
        member_id: &MemberId,
        project_path: &Path,
    ) -> Result<RegisteredSession, EngineError> {
        let _guard = self.member_locks.acquire(member_id).await;

        let mut team = self
            .storage
            .get_team(team_id)
            .ok_or_else(|| EngineError::SessionNotFound(format!("team {team_id} has no member {member_id}")))?;
        let member = team
            .member(member_id.as_str())
            .cloned()
            .ok_or_else(|| EngineError::SessionNotFound(member_id.to_string()))?;

        let session_name = if member.session_name.is_empty() {
            Self::session_name_for(&team.id.short(8).to_lowercase(), member.role, member_id.short(8))
        } else {
            member.session_name.clone()
        };
        let profile = RoleProfile::for_role(member.role);
        let prompt = if member.system_prompt.is_empty() {
            profile.default_system_prompt(&member.name, &project_path.display().to_string())
        } else {
            member.system_prompt.clone()
        };

        let budget = self.config.supervisor_timeout / 3;

        // Step 1: direct prompt.
        self.sessions.create(&session_name, project_path, member.role.as_str()).await?;
        self.sessions.send_message(&session_name, &prompt).await?;
        self.sessions.send_key(&session_name, "Enter").await?;
        if self.wait_for_registration(member.role, &session_name, budget).await {
            return self.finish_registration(&mut team, member_id, &session_name, "registered via direct prompt").await;
        }

        // Step 2: cleanup and reinit.
        warn!(session = %session_name, "registration step 1 timed out, retrying with cleanup");
        self.sessions.send_key(&session_name, "C-c").await?;
        self.sessions.send_message(&session_name, &prompt).await?;
        self.sessions.send_key(&session_name, "Enter").await?;
        if self.wait_for_registration(member.role, &session_name, budget).await {
            return self.finish_registration(&mut team, member_id, &session_name, "registered via cleanup and reinit").await;
        }

        // Step 3: full recreation.
        warn!(session = %session_name, "registration step 2 timed out, recreating session");
        self.sessions.kill(&session_name).await?;
        self.sessions.create(&session_name, project_path, member.role.as_str()).await?;
        self.sessions.send_message(&session_name, &prompt).await?;
        self.sessions.send_key(&session_name, "Enter").await?;
        if self.wait_for_registration(member.role, &session_name, budget).await {
            return self.finish_registration(&mut team, member_id, &session_name, "registered via full recreation").await;
        }

        // Step 4: fail.
        if let Some(m) = team.member_mut(member_id.as_str()) {
            m.agent_status = AgentStatus::Inactive;
            m.updated_at = self.clock.now();
        }
        let _ = self.storage.save_team(&team);
        Err(EngineError::FailedToInitialize(session_name))
    }

    async fn finish_registration(
        &self,
        team: &mut amx_core::team::Team,
        member_id: &MemberId,
        session_name: &str,
        message: &'static str,
    ) -> Result<RegisteredSession, EngineError> {
        if let Some(m) = team.member_mut(member_id.as_str()) {
            m.mark_session(session_name, &self.clock);
            m.mark_active(&self.clock);
        }
        self.storage.save_team(team)?;
        info!(session = %session_name, message, "member registered");
        Ok(RegisteredSession {
            session_name: session_name.to_string(),
            message,
        })
    }

    async fn wait_for_registration(&self, role: Role, session_name: &str, budget: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + budget;
        loop {
            if self.check_registered(role, session_name).await {
                return true;
            }
            if tokio::time::Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn check_registered(&self, role: Role, session_name: &str) -> bool {
        if let Some(ping) = self.storage.runtime.latest(role) {
            let freshness = self.config.registration_freshness.as_secs() as i64;
            if ping.session_id == session_name && ping.is_fresh(self.clock.now(), freshness) {
                return true;
            }
        }
        matches!(self.sessions.capture_pane(session_name, 50).await, Ok(text) if text.contains(REGISTRATION_MARKER))
    }

    /// Record an out-of-band registration callback (spec §6 runtime
    /// registration endpoint).
    pub fn record_registration_ping(&self, role: Role, session_id: impl Into<String>, member_id: Option<MemberId>) -> Result<(), EngineError> {
        let ping = RuntimePing::new(role, session_id, member_id, "active", &self.clock);
        self.storage.runtime.record(ping)?;
        Ok(())
    }

    /// Start sessions for `member_ids` in batches of at most
    /// `config.batch_size`, with `config.batch_gap` between batches (spec
    /// §4.6). Results are aggregated across all batches before returning.
    pub async fn start_members_batched(self: &Arc<Self>, team_id: &TeamId, project_path: &Path, member_ids: Vec<MemberId>) -> Vec<BatchOutcome> {
        let mut outcomes = Vec::with_capacity(member_ids.len());
        let mut remaining = member_ids;
        let project_path: PathBuf = project_path.to_path_buf();

        while !remaining.is_empty() {
            let batch: Vec<MemberId> = remaining.drain(..remaining.len().min(self.config.batch_size)).collect();
            let mut handles = Vec::with_capacity(batch.len());
            for member_id in batch {
                let supervisor = Arc::clone(self);
                let team_id = team_id.clone();
                let project_path = project_path.clone();
                handles.push(tokio::spawn(async move {
                    let result = supervisor.register_member(&team_id, &member_id, &project_path).await;
                    (member_id, result)
                }));
            }
            for handle in handles {
                match handle.await {
                    Ok((member_id, Ok(registered))) => outcomes.push(BatchOutcome {
                        member_id,
                        session_name: Some(registered.session_name),
                        message: Some(registered.message.to_string()),
                        error: None,
                    }),
                    Ok((member_id, Err(e))) => outcomes.push(BatchOutcome {
                        member_id,
                        session_name: None,
                        message: None,
                        error: Some(e.to_string()),
                    }),
                    Err(join_err) => warn!(error = %join_err, "registration task panicked"),
                }
            }
            if !remaining.is_empty() {
                tokio::time::sleep(self.config.batch_gap).await;
            }
        }

        outcomes
    }
}

fn role_slug(role: Role) -> &'static str {
    match role {
        Role::Orchestrator => "orc",
        Role::Tpm => "tpm",
        Role::Pgm => "pgm",
        Role::Developer => "dev",
        Role::FrontendDeveloper => "fe",
        Role::BackendDeveloper => "be",
        Role::Qa => "qa",
        Role::Tester => "test",
        Role::Designer => "design",
    }
}
