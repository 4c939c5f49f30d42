//! Shared setup for end-to-end scenario specs.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use amx_adapters::session::FakeSessionAdapter;
use amx_api::OrchestrationApi;
use amx_core::clock::FakeClock;
use amx_core::id::{IdGen, SequentialIdGen};
use amx_core::project::{Project, ProjectId};
use amx_core::role::Role;
use amx_engine::EngineConfig;
use amx_storage::{Storage, StoragePaths};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

pub type SpecApi = OrchestrationApi<FakeSessionAdapter, FakeClock, SequentialIdGen>;

/// A fresh `OrchestrationApi` over an isolated home directory, and the
/// directory guard that keeps it alive for the test's lifetime.
pub struct SpecEnv {
    pub api: SpecApi,
    pub home: TempDir,
}

pub fn env() -> SpecEnv {
    let home = tempfile::tempdir().unwrap();
    let storage = Arc::new(Storage::open(StoragePaths::at(home.path().join(".agentmux"))).unwrap());
    let sessions = Arc::new(FakeSessionAdapter::new());
    let api = OrchestrationApi::new(storage, sessions, FakeClock::default(), SequentialIdGen::new("spec"), EngineConfig::default());
    SpecEnv { api, home }
}

/// Register a project rooted at a fresh temp directory, seeded with
/// `.agentmux/tasks` so task-folder operations have somewhere to write.
pub fn seed_project(api: &SpecApi, dir: &Path) -> ProjectId {
    let project = Project::new(ProjectId::new(api.id_gen().next()), "Demo", dir.to_path_buf(), api.clock());
    std::fs::create_dir_all(project.tasks_dir()).unwrap();
    api.storage().save_project(&project).unwrap();
    project.id
}

/// Write an open/in_progress/done/blocked task markdown file under
/// `<tasks_dir>/<milestone>/<status>/<file>`, matching the format
/// `amx-tasks`' frontmatter parser expects.
pub fn write_task(tasks_dir: &Path, milestone: &str, status: &str, file: &str, role: Role) -> PathBuf {
    let dir = tasks_dir.join(milestone).join(status);
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(file);
    let content = format!(
        "---\nid: {file}\ntitle: {file}\nstatus: {status}\npriority: medium\ntargetRole: {role}\nmilestoneId: {milestone}\n---\n\nDo the thing.\n"
    );
    std::fs::write(&path, content).unwrap();
    path
}
