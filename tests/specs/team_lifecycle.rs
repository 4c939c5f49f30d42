//! S1 — create a team, bind it to a project, start it, and check the
//! resulting session/registration state.

use crate::prelude::{env, seed_project};
use amx_adapters::SessionAdapter;
use amx_api::teams::NewMember;
use amx_core::role::Role;

#[tokio::test]
async fn start_team_creates_one_session_per_member_and_marks_them_active() {
    let env = env();
    let project_dir = tempfile::tempdir().unwrap();
    let project_id = seed_project(&env.api, project_dir.path());

    let created = env
        .api
        .create_team(
            "Alpha",
            "",
            vec![
                NewMember { name: "dev-a".into(), role: Role::Developer, system_prompt: None },
                NewMember { name: "qa-b".into(), role: Role::Qa, system_prompt: None },
            ],
        );
    assert!(created.ok);
    let team = created.data.unwrap();

    let result = env.api.start_team(&team.id, Some(project_id)).await;
    assert!(result.ok, "{:?}", result.error);
    let outcomes = result.data.unwrap();
    assert_eq!(outcomes.len(), 2);
    assert!(outcomes.iter().all(|o| o.error.is_none()));

    let team = env.api.storage().get_team(&team.id).unwrap();
    for member in &team.members {
        assert!(!member.session_name.is_empty(), "member {} has no session", member.name);
        assert!(env.api.sessions().exists(&member.session_name).await.unwrap());
    }

    // Default check-ins were scheduled at createTeam time for both
    // non-exempt roles.
    let checkins = env.api.storage().list_active_scheduled_messages().len();
    assert_eq!(checkins, 2);
}
