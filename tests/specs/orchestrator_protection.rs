//! S6 — the orchestrator's own session is never torn down by a bulk
//! `stopTeam`/`stopTeamMember` call, and a team holding it can't be
//! deleted at all.

use crate::prelude::env;
use amx_adapters::SessionAdapter;
use amx_core::orchestrator_status::ORCHESTRATOR_SESSION_ID;
use amx_core::role::Role;
use amx_core::team::{Team, TeamId};
use amx_core::{MemberId, TeamMember};

#[tokio::test]
async fn stop_team_leaves_the_orchestrator_session_running() {
    let env = env();
    let mut orc = TeamMember::new(MemberId::new("m-orc"), "orc", Role::Orchestrator, "", env.api.clock());
    orc.mark_session(ORCHESTRATOR_SESSION_ID, env.api.clock());
    let mut dev = TeamMember::new(MemberId::new("m-dev"), "dev-a", Role::Developer, "", env.api.clock());
    dev.mark_session("alpha-dev-m-dev", env.api.clock());
    let team = Team::new(TeamId::new("t-alpha"), "Alpha", "", vec![orc, dev], env.api.clock());
    env.api.storage().save_team(&team).unwrap();
    env.api.sessions().create(ORCHESTRATOR_SESSION_ID, std::path::Path::new("/tmp/p"), "orchestrator").await.unwrap();
    env.api.sessions().create("alpha-dev-m-dev", std::path::Path::new("/tmp/p"), "developer").await.unwrap();

    let result = env.api.stop_team(&team.id).await;
    assert!(result.ok, "{:?}", result.error);
    assert_eq!(result.data.unwrap().sessions_stopped, 1, "only the non-orchestrator session counts as stopped");

    assert!(env.api.sessions().exists(ORCHESTRATOR_SESSION_ID).await.unwrap());
    assert!(!env.api.sessions().exists("alpha-dev-m-dev").await.unwrap());

    let team = env.api.storage().get_team(&team.id).unwrap();
    assert_eq!(team.member("m-orc").unwrap().session_name, ORCHESTRATOR_SESSION_ID);
    assert!(team.member("m-dev").unwrap().session_name.is_empty());
}

#[tokio::test]
async fn stop_team_member_is_a_noop_for_the_orchestrator_member() {
    let env = env();
    let mut orc = TeamMember::new(MemberId::new("m-orc"), "orc", Role::Orchestrator, "", env.api.clock());
    orc.mark_session(ORCHESTRATOR_SESSION_ID, env.api.clock());
    let team = Team::new(TeamId::new("t-alpha"), "Alpha", "", vec![orc], env.api.clock());
    env.api.storage().save_team(&team).unwrap();
    env.api.sessions().create(ORCHESTRATOR_SESSION_ID, std::path::Path::new("/tmp/p"), "orchestrator").await.unwrap();

    let result = env.api.stop_team_member(&team.id, &MemberId::new("m-orc")).await;
    assert!(result.ok);

    assert!(env.api.sessions().exists(ORCHESTRATOR_SESSION_ID).await.unwrap());
    let team = env.api.storage().get_team(&team.id).unwrap();
    assert_eq!(team.member("m-orc").unwrap().session_name, ORCHESTRATOR_SESSION_ID);
}

#[tokio::test]
async fn delete_team_refuses_to_touch_the_orchestrators_team() {
    let env = env();
    let mut orc = TeamMember::new(MemberId::new("m-orc"), "orc", Role::Orchestrator, "", env.api.clock());
    orc.mark_session(ORCHESTRATOR_SESSION_ID, env.api.clock());
    let team = Team::new(TeamId::new("t-alpha"), "Alpha", "", vec![orc], env.api.clock());
    env.api.storage().save_team(&team).unwrap();

    let result = env.api.delete_team(&team.id).await;
    assert!(!result.ok);
    assert_eq!(result.error.as_deref(), Some("invalid input: cannot delete a team holding the orchestrator session"));
    assert!(env.api.storage().get_team(&team.id).is_some());
}

#[tokio::test]
async fn delete_team_kills_sessions_and_removes_the_team() {
    let env = env();
    let mut dev = TeamMember::new(MemberId::new("m-dev"), "dev-a", Role::Developer, "", env.api.clock());
    dev.mark_session("alpha-dev-m-dev", env.api.clock());
    let team = Team::new(TeamId::new("t-alpha"), "Alpha", "", vec![dev], env.api.clock());
    env.api.storage().save_team(&team).unwrap();
    env.api.sessions().create("alpha-dev-m-dev", std::path::Path::new("/tmp/p"), "developer").await.unwrap();

    let result = env.api.delete_team(&team.id).await;
    assert!(result.ok, "{:?}", result.error);

    assert!(!env.api.sessions().exists("alpha-dev-m-dev").await.unwrap());
    assert!(env.api.storage().get_team(&team.id).is_none());
}
