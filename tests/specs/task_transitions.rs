//! S2 — claim the next open task for a role and check the on-disk move and
//! the registry entry it leaves behind.

use crate::prelude::{env, seed_project, write_task};
use amx_core::status::RegistryStatus;
use amx_core::role::Role;

#[test]
fn take_next_task_moves_file_and_creates_an_assigned_entry() {
    let env = env();
    let project_dir = tempfile::tempdir().unwrap();
    let project_id = seed_project(&env.api, project_dir.path());
    let tasks_dir = project_dir.path().join(".agentmux/tasks");
    write_task(&tasks_dir, "m0_specs", "open", "01_foo_developer.md", Role::Developer);

    let result = env.api.take_next_task(&project_id, Role::Developer);
    assert!(result.ok, "{:?}", result.error);
    let entry = result.data.unwrap().expect("an open task was available");

    assert_eq!(entry.task_file_path, tasks_dir.join("m0_specs/in_progress/01_foo_developer.md"));
    assert!(entry.task_file_path.exists());
    assert!(!tasks_dir.join("m0_specs/open/01_foo_developer.md").exists());
    assert_eq!(entry.target_role, Role::Developer);
    assert_eq!(entry.status, RegistryStatus::Assigned);

    let entries = env.api.storage().list_registry_entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id, entry.id);
}

#[test]
fn take_next_task_falls_back_to_any_open_task_when_role_has_none() {
    let env = env();
    let project_dir = tempfile::tempdir().unwrap();
    let project_id = seed_project(&env.api, project_dir.path());
    let tasks_dir = project_dir.path().join(".agentmux/tasks");
    write_task(&tasks_dir, "m0_specs", "open", "00_qa_only.md", Role::Qa);

    let result = env.api.take_next_task(&project_id, Role::Developer);
    assert!(result.ok);
    let entry = result.data.unwrap().expect("falls back to the only open task");
    assert_eq!(entry.target_role, Role::Qa);
}

#[test]
fn completing_a_task_moves_it_to_done_and_drops_the_registry_entry() {
    let env = env();
    let project_dir = tempfile::tempdir().unwrap();
    let project_id = seed_project(&env.api, project_dir.path());
    let tasks_dir = project_dir.path().join(".agentmux/tasks");
    write_task(&tasks_dir, "m0_specs", "open", "01_foo_developer.md", Role::Developer);
    let entry = env.api.take_next_task(&project_id, Role::Developer).data.unwrap().unwrap();

    let result = env.api.complete_task(&project_id, &entry.id);
    assert!(result.ok);
    assert!(tasks_dir.join("m0_specs/done/01_foo_developer.md").exists());
    assert!(env.api.storage().get_registry_entry(&entry.id).is_none());
}
