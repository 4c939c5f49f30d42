//! Cross-cutting invariants that should hold regardless of which operation
//! exercises them: team name uniqueness, idempotent task assignment, and
//! persistence round-trips that don't silently mutate data.

use crate::prelude::{env, seed_project, write_task};
use amx_api::teams::NewMember;
use amx_core::role::Role;
use amx_core::task_frontmatter::Priority;
use amx_core::MemberId;

fn developer(name: &str) -> NewMember {
    NewMember { name: name.into(), role: Role::Developer, system_prompt: None }
}

#[test]
fn team_names_are_unique_across_the_whole_store() {
    let env = env();
    let first = env.api.create_team("Alpha", "", vec![developer("dev-a")]);
    assert!(first.ok);

    let second = env.api.create_team("Alpha", "", vec![developer("dev-b")]);
    assert!(!second.ok);
    assert!(second.error.unwrap().contains("Alpha"));

    assert_eq!(env.api.storage().list_teams().len(), 1);
}

#[test]
fn assign_task_with_identical_params_does_not_duplicate_the_registry_entry() {
    let env = env();
    let project_dir = tempfile::tempdir().unwrap();
    let project_id = seed_project(&env.api, project_dir.path());
    let tasks_dir = project_dir.path().join(".agentmux/tasks");
    let path = write_task(&tasks_dir, "m0_specs", "open", "01_foo_developer.md", Role::Developer);
    let member_id = MemberId::new("m1");

    let first = env.api.assign_task(&project_id, &path, "foo", Role::Developer, Some(member_id.clone()), Some("s1".into()), Priority::Medium);
    assert!(first.ok);
    let moved = first.data.unwrap().task_file_path;

    let second = env.api.assign_task(&project_id, &moved, "foo", Role::Developer, Some(member_id), Some("s1".into()), Priority::Medium);
    assert!(second.ok, "{:?}", second.error);

    assert_eq!(env.api.storage().list_registry_entries().len(), 1);
}

#[test]
fn saving_a_team_twice_with_no_changes_round_trips_identically_apart_from_updated_at() {
    let env = env();
    let created = env.api.create_team("Alpha", "", vec![developer("dev-a")]);
    let team = created.data.unwrap();

    let reloaded = env.api.storage().get_team(&team.id).unwrap();
    env.api.storage().save_team(&reloaded).unwrap();
    let reloaded_again = env.api.storage().get_team(&team.id).unwrap();

    assert_eq!(reloaded_again.id, team.id);
    assert_eq!(reloaded_again.name, team.name);
    assert_eq!(reloaded_again.members.len(), team.members.len());
    assert_eq!(reloaded_again.members[0].id, team.members[0].id);
    assert_eq!(reloaded_again.members[0].session_name, team.members[0].session_name);
}
