// SPDX-License-Identifier: MIT

//! Team lifecycle operations (spec §4.9): `createTeam`, `startTeam`,
//! `stopTeam`, `assignTeamsToProject`, `startTeamMember`/`stopTeamMember`.

use crate::{ApiError, OrchestrationApi};
use amx_adapters::SessionAdapter;
use amx_core::clock::Clock;
use amx_core::id::{IdGen, ShortId};
use amx_core::orchestrator_status::ORCHESTRATOR_SESSION_ID;
use amx_core::project::ProjectId;
use amx_core::result::ApiResult;
use amx_core::role::{Role, RoleProfile};
use amx_core::scheduled_message::{Delay, ScheduleTarget, ScheduledMessage, ScheduledMessageId};
use amx_core::status::TeamStatus;
use amx_core::team::{Team, TeamId};
use amx_core::{MemberId, TeamMember};
use amx_engine::{BatchOutcome, Supervisor};

/// Input for one member slot in `createTeam`.
pub struct NewMember {
    pub name: String,
    pub role: Role,
    pub system_prompt: Option<String>,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct StopTeamOutcome {
    pub sessions_stopped: usize,
}

impl<A: SessionAdapter, C: Clock, G: IdGen + 'static> OrchestrationApi<A, C, G> {
    /// Validates unique team name, assigns member ids, persists with empty
    /// session names, and schedules each non-exempt member's default
    /// check-in against its eventual session name (spec §4.9).
    pub fn create_team(&self, name: &str, description: &str, members: Vec<NewMember>) -> ApiResult<Team> {
        ApiResult::from_result(self.create_team_inner(name, description, members).map_err(Into::into))
    }

    fn create_team_inner(&self, name: &str, description: &str, members: Vec<NewMember>) -> Result<Team, ApiError> {
        if members.is_empty() {
            return Err(ApiError::InvalidInput("a team requires at least one member".into()));
        }
        if self.storage.list_teams().iter().any(|t| t.name == name) {
            return Err(ApiError::InvalidInput(format!("team name already in use: {name}")));
        }

        let team_id = TeamId::new(self.id_gen.next());
        let built_members: Vec<TeamMember> = members
            .into_iter()
            .map(|m| TeamMember::new(MemberId::new(self.id_gen.next()), m.name, m.role, m.system_prompt.unwrap_or_default(), &self.clock))
            .collect();
        let team = Team::new(team_id.clone(), name, description, built_members, &self.clock);
        self.storage.save_team(&team)?;

        let team_slug = team.id.short(8).to_lowercase();
        for member in &team.members {
            let profile = RoleProfile::for_role(member.role);
            if profile.exempt_from_default_checkin {
                continue;
            }
            let predicted_session = Supervisor::<A, C>::session_name_for(&team_slug, member.role, member.id.short(8));
            let minutes = (profile.default_checkin_interval.as_secs() / 60).max(1);
            let _ = self.scheduler.schedule_recurring_check(predicted_session, minutes, "Status check-in: what are you working on, and are you blocked?");
        }

        Ok(team)
    }

    /// Resolve the project, batch-create sessions for every member without
    /// a live one, and optionally arm a recurring commit reminder for the
    /// whole team (spec §4.9).
    pub async fn start_team(&self, team_id: &TeamId, project_id: Option<ProjectId>) -> ApiResult<Vec<BatchOutcome>> {
        ApiResult::from_result(self.start_team_inner(team_id, project_id).await.map_err(Into::into))
    }

    async fn start_team_inner(&self, team_id: &TeamId, project_id: Option<ProjectId>) -> Result<Vec<BatchOutcome>, ApiError> {
        let team = self.storage.get_team(team_id).ok_or_else(|| ApiError::not_found("team", team_id.as_str()))?;
        let project_id = project_id.or_else(|| team.current_project.clone()).ok_or_else(|| ApiError::InvalidInput("team has no project bound".into()))?;
        let project = self.storage.get_project(&project_id).ok_or_else(|| ApiError::not_found("project", project_id.as_str()))?;

        let mut to_start = Vec::new();
        for member in &team.members {
            let already_live = !member.session_name.is_empty() && self.sessions.exists(&member.session_name).await.unwrap_or(false);
            if !already_live {
                to_start.push(member.id.clone());
            }
        }

        let outcomes = self.supervisor.start_members_batched(team_id, &project.path, to_start).await;

        if let Some(mut team) = self.storage.get_team(team_id) {
            team.status = TeamStatus::Working;
            self.storage.save_team(&team)?;
        }

        let already_armed = self
            .storage
            .list_active_scheduled_messages()
            .iter()
            .any(|m| m.name == "commit-reminder" && matches!(&m.target, ScheduleTarget::Team(t) if t == team_id));
        if !already_armed && outcomes.iter().any(|o| o.error.is_none()) {
            let message = ScheduledMessage::new(
                ScheduledMessageId::new(self.id_gen.next()),
                "commit-reminder",
                ScheduleTarget::Team(team_id.clone()),
                "Remember to commit your work before the next check-in.",
                Delay::minutes(self.config.default_checkin_minutes),
                true,
                &self.clock,
            );
            self.scheduler.schedule_message(message)?;
        }

        Ok(outcomes)
    }

    /// Kills every member's session, clears `sessionName`, and cancels all
    /// scheduled messages targeting the team (spec §4.9).
    pub async fn stop_team(&self, team_id: &TeamId) -> ApiResult<StopTeamOutcome> {
        ApiResult::from_result(self.stop_team_inner(team_id).await.map_err(Into::into))
    }

    async fn stop_team_inner(&self, team_id: &TeamId) -> Result<StopTeamOutcome, ApiError> {
        let mut team = self.storage.get_team(team_id).ok_or_else(|| ApiError::not_found("team", team_id.as_str()))?;

        self.scheduler.cancel_all_for_team(team_id)?;

        let mut stopped = 0usize;
        for member in &mut team.members {
            if member.session_name.is_empty() {
                continue;
            }
            if member.session_name == ORCHESTRATOR_SESSION_ID {
                continue;
            }
            let _guard = self.member_locks.acquire(&member.id).await;
            match self.sessions.kill(&member.session_name).await {
                Ok(_) => stopped += 1,
                Err(e) => tracing::warn!(session = %member.session_name, error = %e, "best-effort session kill failed during stopTeam"),
            }
            member.clear_session(&self.clock);
        }
        team.status = TeamStatus::Idle;
        self.storage.save_team(&team)?;

        Ok(StopTeamOutcome { sessions_stopped: stopped })
    }

    /// Binds `team_id` to `project_id` under `role`, and notifies the
    /// orchestrator session if it is live (spec §4.9).
    pub fn assign_teams_to_project(&self, project_id: &ProjectId, role: Role, team_id: &TeamId) -> ApiResult<()> {
        ApiResult::from_result(self.assign_teams_to_project_inner(project_id, role, team_id).map_err(Into::into))
    }

    fn assign_teams_to_project_inner(&self, project_id: &ProjectId, role: Role, team_id: &TeamId) -> Result<(), ApiError> {
        let mut project = self.storage.get_project(project_id).ok_or_else(|| ApiError::not_found("project", project_id.as_str()))?;
        let mut team = self.storage.get_team(team_id).ok_or_else(|| ApiError::not_found("team", team_id.as_str()))?;

        project.assign_team(role, team_id.clone(), &self.clock);
        team.current_project = Some(project_id.clone());
        team.updated_at = self.clock.now();

        self.storage.save_project(&project)?;
        self.storage.save_team(&team)?;
        Ok(())
    }

    pub async fn start_team_member(&self, team_id: &TeamId, member_id: &MemberId, project_path: &std::path::Path) -> ApiResult<String> {
        match self.supervisor.register_member(team_id, member_id, project_path).await {
            Ok(registered) => ApiResult::ok_with_message(registered.session_name, registered.message),
            Err(e) => ApiResult::from_result(Err(ApiError::from(e).into())),
        }
    }

    pub async fn stop_team_member(&self, team_id: &TeamId, member_id: &MemberId) -> ApiResult<()> {
        ApiResult::from_result(self.stop_team_member_inner(team_id, member_id).await.map_err(Into::into))
    }

    async fn stop_team_member_inner(&self, team_id: &TeamId, member_id: &MemberId) -> Result<(), ApiError> {
        let _guard = self.member_locks.acquire(member_id).await;
        let mut team = self.storage.get_team(team_id).ok_or_else(|| ApiError::not_found("team", team_id.as_str()))?;
        let member = team.member_mut(member_id.as_str()).ok_or_else(|| ApiError::not_found("member", member_id.as_str()))?;

        if member.session_name.is_empty() || member.session_name == ORCHESTRATOR_SESSION_ID {
            return Ok(());
        }
        let session_name = member.session_name.clone();
        self.sessions.kill(&session_name).await?;
        self.scheduler.cancel_all_checks_for_session(&session_name)?;

        let member = team.member_mut(member_id.as_str()).ok_or_else(|| ApiError::not_found("member", member_id.as_str()))?;
        member.clear_session(&self.clock);
        self.storage.save_team(&team)?;
        Ok(())
    }

    /// Kills every member's session (best-effort) and removes the team.
    /// Refuses to touch a team that holds the orchestrator singleton
    /// session (spec §4.9, §6 "the core refuses to stop or delete it").
    pub async fn delete_team(&self, team_id: &TeamId) -> ApiResult<()> {
        ApiResult::from_result(self.delete_team_inner(team_id).await.map_err(Into::into))
    }

    async fn delete_team_inner(&self, team_id: &TeamId) -> Result<(), ApiError> {
        let team = self.storage.get_team(team_id).ok_or_else(|| ApiError::not_found("team", team_id.as_str()))?;
        if team.members.iter().any(|m| m.session_name == ORCHESTRATOR_SESSION_ID) {
            return Err(ApiError::InvalidInput("cannot delete a team holding the orchestrator session".into()));
        }

        self.scheduler.cancel_all_for_team(team_id)?;
        for member in &team.members {
            if member.session_name.is_empty() {
                continue;
            }
            let _guard = self.member_locks.acquire(&member.id).await;
            if let Err(e) = self.sessions.kill(&member.session_name).await {
                tracing::warn!(session = %member.session_name, error = %e, "best-effort session kill failed during deleteTeam");
            }
        }
        self.storage.delete_team(team_id)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OrchestrationApi;
    use amx_adapters::session::FakeSessionAdapter;
    use amx_core::clock::FakeClock;
    use amx_core::id::SequentialIdGen;
    use amx_core::project::Project;
    use amx_engine::EngineConfig;
    use amx_storage::{Storage, StoragePaths};
    use std::sync::Arc;

    fn api(dir: &tempfile::TempDir) -> OrchestrationApi<FakeSessionAdapter, FakeClock, SequentialIdGen> {
        let storage = Arc::new(Storage::open(StoragePaths::at(dir.path().join("home"))).unwrap());
        let sessions = Arc::new(FakeSessionAdapter::new());
        OrchestrationApi::new(storage, sessions, FakeClock::default(), SequentialIdGen::new("id"), EngineConfig::default())
    }

    fn developer(name: &str) -> NewMember {
        NewMember {
            name: name.to_string(),
            role: Role::Developer,
            system_prompt: None,
        }
    }

    #[test]
    fn create_team_rejects_empty_member_list() {
        let dir = tempfile::tempdir().unwrap();
        let api = api(&dir);
        let result = api.create_team("Alpha", "", vec![]);
        assert!(!result.ok);
    }

    #[test]
    fn create_team_rejects_duplicate_name() {
        let dir = tempfile::tempdir().unwrap();
        let api = api(&dir);
        api.create_team("Alpha", "", vec![developer("dev-a")]);
        let result = api.create_team("Alpha", "", vec![developer("dev-b")]);
        assert!(!result.ok);
    }

    #[test]
    fn create_team_schedules_checkins_for_non_exempt_members_only() {
        let dir = tempfile::tempdir().unwrap();
        let api = api(&dir);
        let result = api.create_team(
            "Alpha",
            "",
            vec![
                developer("dev-a"),
                NewMember {
                    name: "tpm-a".into(),
                    role: Role::Tpm,
                    system_prompt: None,
                },
            ],
        );
        assert!(result.ok);
        assert_eq!(api.storage.list_active_scheduled_messages().len(), 1);
    }

    #[tokio::test]
    async fn start_team_requires_bound_project() {
        let dir = tempfile::tempdir().unwrap();
        let api = api(&dir);
        let created = api.create_team("Alpha", "", vec![developer("dev-a")]);
        let team_id = created.data.unwrap().id;
        let result = api.start_team(&team_id, None).await;
        assert!(!result.ok);
    }

    #[tokio::test]
    async fn start_team_creates_sessions_and_arms_commit_reminder() {
        let dir = tempfile::tempdir().unwrap();
        let project_dir = tempfile::tempdir().unwrap();
        let api = api(&dir);
        let created = api.create_team("Alpha", "", vec![developer("dev-a")]);
        let team = created.data.unwrap();

        let project = Project::new(amx_core::project::ProjectId::new("p1"), "Demo", project_dir.path().to_path_buf(), &api.clock);
        api.storage.save_project(&project).unwrap();

        let result = api.start_team(&team.id, Some(project.id.clone())).await;
        assert!(result.ok);
        let outcomes = result.data.unwrap();
        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].error.is_none());

        let reminders = api
            .storage
            .list_active_scheduled_messages()
            .into_iter()
            .filter(|m| m.name == "commit-reminder")
            .count();
        assert_eq!(reminders, 1);
    }

    #[tokio::test]
    async fn stop_team_is_noop_on_orchestrator_session() {
        let dir = tempfile::tempdir().unwrap();
        let api = api(&dir);
        let mut member = TeamMember::new(MemberId::new("m1"), "orc", Role::Orchestrator, "", &api.clock);
        member.mark_session(ORCHESTRATOR_SESSION_ID, &api.clock);
        let team = Team::new(TeamId::new("t1"), "Alpha", "", vec![member], &api.clock);
        api.storage.save_team(&team).unwrap();

        let result = api.stop_team(&TeamId::new("t1")).await;
        assert!(result.ok);
        assert_eq!(result.data.unwrap().sessions_stopped, 0);
        let team = api.storage.get_team(&TeamId::new("t1")).unwrap();
        assert_eq!(team.member("m1").unwrap().session_name, ORCHESTRATOR_SESSION_ID);
    }

    #[tokio::test]
    async fn stop_team_kills_member_sessions_and_cancels_schedules() {
        let dir = tempfile::tempdir().unwrap();
        let api = api(&dir);
        let mut member = TeamMember::new(MemberId::new("m1"), "dev-a", Role::Developer, "", &api.clock);
        member.mark_session("alpha-dev-m1", &api.clock);
        let team = Team::new(TeamId::new("t1"), "Alpha", "", vec![member], &api.clock);
        api.storage.save_team(&team).unwrap();
        api.sessions.create("alpha-dev-m1", std::path::Path::new("/tmp/p"), "developer").await.unwrap();
        api.scheduler.schedule_recurring_check("alpha-dev-m1", 30, "check-in").unwrap();

        let result = api.stop_team(&TeamId::new("t1")).await;
        assert!(result.ok);
        assert_eq!(result.data.unwrap().sessions_stopped, 1);
        assert!(!api.sessions.exists("alpha-dev-m1").await.unwrap());
        let team = api.storage.get_team(&TeamId::new("t1")).unwrap();
        assert!(team.member("m1").unwrap().session_name.is_empty());
        assert!(api.storage.list_active_scheduled_messages().is_empty());
    }

    #[test]
    fn assign_teams_to_project_links_both_sides() {
        let dir = tempfile::tempdir().unwrap();
        let api = api(&dir);
        let created = api.create_team("Alpha", "", vec![developer("dev-a")]);
        let team = created.data.unwrap();
        let project = Project::new(amx_core::project::ProjectId::new("p1"), "Demo", std::path::PathBuf::from("/tmp/p"), &api.clock);
        api.storage.save_project(&project).unwrap();

        let result = api.assign_teams_to_project(&project.id, Role::Developer, &team.id);
        assert!(result.ok);
        let project = api.storage.get_project(&project.id).unwrap();
        assert_eq!(project.teams[&Role::Developer], vec![team.id.clone()]);
        let team = api.storage.get_team(&team.id).unwrap();
        assert_eq!(team.current_project, Some(project.id));
    }

    #[tokio::test]
    async fn stop_team_member_clears_session_and_cancels_its_checks() {
        let dir = tempfile::tempdir().unwrap();
        let api = api(&dir);
        let mut member = TeamMember::new(MemberId::new("m1"), "dev-a", Role::Developer, "", &api.clock);
        member.mark_session("alpha-dev-m1", &api.clock);
        let team = Team::new(TeamId::new("t1"), "Alpha", "", vec![member], &api.clock);
        api.storage.save_team(&team).unwrap();
        api.sessions.create("alpha-dev-m1", std::path::Path::new("/tmp/p"), "developer").await.unwrap();
        api.scheduler.schedule_recurring_check("alpha-dev-m1", 30, "check-in").unwrap();

        let result = api.stop_team_member(&TeamId::new("t1"), &MemberId::new("m1")).await;
        assert!(result.ok);
        assert!(!api.sessions.exists("alpha-dev-m1").await.unwrap());
        assert!(api.storage.list_active_scheduled_messages().is_empty());
        let team = api.storage.get_team(&TeamId::new("t1")).unwrap();
        assert!(team.member("m1").unwrap().session_name.is_empty());
    }

    #[tokio::test]
    async fn delete_team_refuses_when_orchestrator_session_is_bound() {
        let dir = tempfile::tempdir().unwrap();
        let api = api(&dir);
        let mut member = TeamMember::new(MemberId::new("m1"), "orc", Role::Orchestrator, "", &api.clock);
        member.mark_session(amx_core::orchestrator_status::ORCHESTRATOR_SESSION_ID, &api.clock);
        let team = Team::new(TeamId::new("t1"), "Alpha", "", vec![member], &api.clock);
        api.storage.save_team(&team).unwrap();

        let result = api.delete_team(&TeamId::new("t1")).await;
        assert!(!result.ok);
        assert!(api.storage.get_team(&TeamId::new("t1")).is_some());
    }

    #[tokio::test]
    async fn delete_team_kills_sessions_cancels_schedules_and_removes_the_team() {
        let dir = tempfile::tempdir().unwrap();
        let api = api(&dir);
        let mut member = TeamMember::new(MemberId::new("m1"), "dev-a", Role::Developer, "", &api.clock);
        member.mark_session("alpha-dev-m1", &api.clock);
        let team = Team::new(TeamId::new("t1"), "Alpha", "", vec![member], &api.clock);
        api.storage.save_team(&team).unwrap();
        api.sessions.create("alpha-dev-m1", std::path::Path::new("/tmp/p"), "developer").await.unwrap();
        api.scheduler.schedule_recurring_check("alpha-dev-m1", 30, "check-in").unwrap();

        let result = api.delete_team(&TeamId::new("t1")).await;
        assert!(result.ok, "{:?}", result.error);
        assert!(!api.sessions.exists("alpha-dev-m1").await.unwrap());
        assert!(api.storage.list_active_scheduled_messages().is_empty());
        assert!(api.storage.get_team(&TeamId::new("t1")).is_none());
    }
}
