// SPDX-License-Identifier: MIT

//! [`WorkflowEngine`]: the step-config templating and delivery engine
//! (spec §4.8). Step configs are JSON documents under
//! `<project>/config/{build_spec_prompt.json, build_tasks_prompt.json}`.

use crate::config::EngineConfig;
use crate::error::EngineError;
use amx_adapters::SessionAdapter;
use amx_core::clock::Clock;
use amx_core::id::IdGen;
use amx_core::project::{Project, ProjectId};
use amx_core::role::Role;
use amx_core::status::TaskFolderStatus;
use amx_core::task_frontmatter::{Priority, TaskFrontmatter};
use amx_storage::Storage;
use amx_tasks::{frontmatter, TaskFolderStore, TaskRegistry};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// A single step in a workflow config (spec §4.8).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowStep {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub delay_minutes: Option<u64>,
    pub prompts: Vec<String>,
    #[serde(default)]
    pub verification: Option<Verification>,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verification {
    #[serde(rename = "type")]
    pub kind: String,
    pub paths: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowConfig {
    pub steps: Vec<WorkflowStep>,
}

impl WorkflowConfig {
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let text = std::fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound(path.display().to_string()))?;
        serde_json::from_str(&text).map_err(|e| EngineError::ConfigNotFound(format!("{}: {e}", path.display())))
    }

    pub fn step(&self, id: &str) -> Result<&WorkflowStep, EngineError> {
        self.steps.iter().find(|s| s.id == id).ok_or_else(|| EngineError::StepNotFound(id.to_string()))
    }
}

/// Substitutes `{PROJECT_NAME}`, `{PROJECT_ID}`, `{PROJECT_PATH}`,
/// `{INITIAL_GOAL}`, `{USER_JOURNEY}` from project metadata and the
/// optional `initial_goal.md` / `user_journey.md` spec files. Unresolved
/// placeholders are left as-is (spec §4.8: "template substitution never
/// fails").
pub fn render_template(template: &str, project: &Project) -> String {
    let initial_goal = read_spec_file(project, "initial_goal.md");
    let user_journey = read_spec_file(project, "user_journey.md");
    template
        .replace("{PROJECT_NAME}", &project.name)
        .replace("{PROJECT_ID}", project.id.as_str())
        .replace("{PROJECT_PATH}", &project.path.display().to_string())
        .replace("{INITIAL_GOAL}", &initial_goal)
        .replace("{USER_JOURNEY}", &user_journey)
}

fn read_spec_file(project: &Project, file_name: &str) -> String {
    std::fs::read_to_string(project.specs_dir().join(file_name)).unwrap_or_default()
}

fn join_prompts(step: &WorkflowStep, project: &Project) -> String {
    step.prompts.iter().map(|p| render_template(p, project)).collect::<Vec<_>>().join("\n\n")
}

pub struct WorkflowEngine<A: SessionAdapter, G: IdGen, C: Clock> {
    storage: Arc<Storage>,
    sessions: Arc<A>,
    tasks: TaskRegistry<G, C>,
    folder_store: TaskFolderStore,
    config: EngineConfig,
}

impl<A: SessionAdapter, G: IdGen, C: Clock> WorkflowEngine<A, G, C> {
    pub fn new(storage: Arc<Storage>, sessions: Arc<A>, id_gen: G, clock: C, config: EngineConfig) -> Self {
        let tasks = TaskRegistry::new(storage.clone(), id_gen, clock);
        Self {
            storage,
            sessions,
            tasks,
            folder_store: TaskFolderStore::new(),
            config,
        }
    }

    fn project(&self, project_id: &ProjectId) -> Result<Project, EngineError> {
        self.storage
            .get_project(project_id)
            .ok_or_else(|| EngineError::ConfigNotFound(format!("project {project_id} not found")))
    }

    /// Retry a specific step: template it, join its prompts with a blank
    /// line, and deliver once to `session_name` (spec §4.8 "retry a
    /// specific step").
    pub async fn retry_step(&self, project_id: &ProjectId, config: &WorkflowConfig, step_id: &str, session_name: &str) -> Result<(), EngineError> {
        if !self.sessions.exists(session_name).await? {
            return Err(EngineError::SessionNotFound(session_name.to_string()));
        }
        let project = self.project(project_id)?;
        let step = config.step(step_id)?;
        let text = join_prompts(step, &project);
        self.sessions.send_message(session_name, &text).await?;
        self.sessions.send_key(session_name, "Enter").await?;
        Ok(())
    }

    /// Generate tasks from a config: for each step, synthesize a task
    /// markdown file under the milestone's `open/` folder and register a
    /// queue entry for the orchestrator to assign by role (spec §4.8
    /// "generate tasks from a config").
    pub fn generate_tasks(&self, project_id: ProjectId, config: &WorkflowConfig, milestone_id: &str, target_role: Role) -> Result<Vec<String>, EngineError> {
        let project = self.project(&project_id)?;
        let tasks_dir = project.tasks_dir();
        self.folder_store
            .ensure_milestone_folders(&tasks_dir, milestone_id)
            .map_err(|e| EngineError::Storage(e.to_string()))?;

        let mut written = Vec::new();
        for (index, step) in config.steps.iter().enumerate() {
            let body = join_prompts(step, &project);
            let frontmatter = TaskFrontmatter {
                id: format!("{milestone_id}-{}", step.id),
                title: step.name.clone(),
                status: "open".to_string(),
                priority: Priority::Medium,
                target_role: Some(target_role),
                dependencies: step.dependencies.clone(),
                estimated_hours: None,
                milestone_id: milestone_id.to_string(),
            };
            let rendered = frontmatter::render(&frontmatter, &body);
            let file_name = format!("{:02}_{}.md", index + 1, slugify(&step.name));
            let path = tasks_dir.join(milestone_id).join(TaskFolderStatus::Open.folder_name()).join(&file_name);
            std::fs::write(&path, rendered).map_err(|e| EngineError::Storage(e.to_string()))?;

            self.tasks
                .assign_task(project_id.clone(), path.clone(), &step.name, target_role, None, None, Priority::Medium)
                .map_err(|e| EngineError::Storage(e.to_string()))?;
            written.push(path.display().to_string());
        }
        Ok(written)
    }

    /// File-gated TPM workflow (spec §4.8, gated behind
    /// `EngineConfig.enable_file_gated_tpm_workflow`): find the first step
    /// whose `verification` paths don't all exist yet, and deliver its
    /// prompt. Returns `None` once every step's files are present.
    pub async fn next_gated_step(&self, project_id: &ProjectId, config: &WorkflowConfig, session_name: &str) -> Result<Option<String>, EngineError> {
        if !self.config.enable_file_gated_tpm_workflow {
            return Err(EngineError::FeatureDisabled("file_gated_tpm_workflow".to_string()));
        }
        let project = self.project(project_id)?;
        for step in &config.steps {
            let satisfied = step
                .verification
                .as_ref()
                .map(|v| v.paths.iter().all(|p| project.path.join(p).exists()))
                .unwrap_or(false);
            if satisfied {
                continue;
            }
            if !self.sessions.exists(session_name).await? {
                return Err(EngineError::SessionNotFound(session_name.to_string()));
            }
            let text = join_prompts(step, &project);
            self.sessions.send_message(session_name, &text).await?;
            self.sessions.send_key(session_name, "Enter").await?;
            return Ok(Some(step.id.clone()));
        }
        Ok(None)
    }
}

fn slugify(name: &str) -> String {
    name.to_ascii_lowercase().chars().map(|c| if c.is_ascii_alphanumeric() { c } else { '_' }).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use amx_adapters::session::FakeSessionAdapter;
    use amx_core::clock::FakeClock;
    use amx_core::id::SequentialIdGen;
    use amx_storage::StoragePaths;

    fn sample_config() -> WorkflowConfig {
        WorkflowConfig {
            steps: vec![
                WorkflowStep {
                    id: "s1".into(),
                    name: "Draft spec".into(),
                    delay_minutes: None,
                    prompts: vec!["Write the spec for {PROJECT_NAME} at {PROJECT_PATH}.".into()],
                    verification: Some(Verification {
                        kind: "file_exists".into(),
                        paths: vec!["specs/draft.md".into()],
                    }),
                    dependencies: vec![],
                },
                WorkflowStep {
                    id: "s2".into(),
                    name: "Review spec".into(),
                    delay_minutes: None,
                    prompts: vec!["Review the goal: {INITIAL_GOAL}".into()],
                    verification: None,
                    dependencies: vec!["s1".into()],
                },
            ],
        }
    }

    fn engine(dir: &tempfile::TempDir) -> (WorkflowEngine<FakeSessionAdapter, SequentialIdGen, FakeClock>, Arc<Storage>, Arc<FakeSessionAdapter>) {
        let storage = Arc::new(Storage::open(StoragePaths::at(dir.path())).unwrap());
        let sessions = Arc::new(FakeSessionAdapter::new());
        let mut config = EngineConfig::default();
        config.enable_file_gated_tpm_workflow = true;
        let engine = WorkflowEngine::new(storage.clone(), sessions.clone(), SequentialIdGen::new("task"), FakeClock::default(), config);
        (engine, storage, sessions)
    }

    fn seed_project(storage: &Storage, project_dir: &Path) -> ProjectId {
        let clock = FakeClock::default();
        let project = Project::new(ProjectId::new("p1"), "Demo", project_dir.to_path_buf(), &clock);
        std::fs::create_dir_all(project.specs_dir()).unwrap();
        std::fs::write(project.specs_dir().join("initial_goal.md"), "ship the thing").unwrap();
        storage.save_project(&project).unwrap();
        project.id
    }

    #[test]
    fn template_substitutes_known_placeholders_and_leaves_rest() {
        let dir = tempfile::tempdir().unwrap();
        let clock = FakeClock::default();
        let project = Project::new(ProjectId::new("p1"), "Demo", dir.path().to_path_buf(), &clock);
        let rendered = render_template("{PROJECT_NAME} at {PROJECT_PATH}, unknown {UNKNOWN_TOKEN}", &project);
        assert!(rendered.starts_with("Demo at"));
        assert!(rendered.contains("{UNKNOWN_TOKEN}"));
    }

    #[tokio::test]
    async fn retry_step_fails_with_session_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let (engine, storage, _sessions) = engine(&dir);
        let project_id = seed_project(&storage, dir.path());
        let config = sample_config();

        let err = engine.retry_step(&project_id, &config, "s1", "missing-session").await.unwrap_err();
        assert!(matches!(err, EngineError::SessionNotFound(_)));
    }

    #[tokio::test]
    async fn retry_step_delivers_rendered_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let (engine, storage, sessions) = engine(&dir);
        let project_id = seed_project(&storage, dir.path());
        sessions.create("alpha-tpm-a", Path::new("/tmp/p"), "tpm").await.unwrap();
        let config = sample_config();

        engine.retry_step(&project_id, &config, "s1", "alpha-tpm-a").await.unwrap();

        let session = sessions.get_session("alpha-tpm-a").unwrap();
        assert!(session.alive);
        let calls = sessions.calls();
        assert!(calls.iter().any(|c| matches!(c, amx_adapters::session::SessionCall::SendMessage { text, .. } if text.contains("Demo"))));
    }

    #[test]
    fn unknown_step_id_is_step_not_found() {
        let config = sample_config();
        assert!(matches!(config.step("ghost"), Err(EngineError::StepNotFound(_))));
    }

    #[test]
    fn generate_tasks_writes_open_files_and_registers_entries() {
        let dir = tempfile::tempdir().unwrap();
        let (engine, storage, _sessions) = engine(&dir);
        let project_id = seed_project(&storage, dir.path());
        let config = sample_config();

        let written = engine.generate_tasks(project_id.clone(), &config, "m0_specs", Role::Tpm).unwrap();
        assert_eq!(written.len(), 2);
        for path in &written {
            assert!(Path::new(path).exists());
        }

        let entries = storage.list_registry_entries();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.target_role == Role::Tpm));
    }

    #[tokio::test]
    async fn gated_workflow_skips_satisfied_steps() {
        let dir = tempfile::tempdir().unwrap();
        let (engine, storage, sessions) = engine(&dir);
        let project_id = seed_project(&storage, dir.path());
        sessions.create("alpha-tpm-a", Path::new("/tmp/p"), "tpm").await.unwrap();
        std::fs::write(dir.path().join("specs/draft.md"), "done").unwrap();
        let config = sample_config();

        let next = engine.next_gated_step(&project_id, &config, "alpha-tpm-a").await.unwrap();
        assert_eq!(next, Some("s2".to_string()));
    }

    #[tokio::test]
    async fn gated_workflow_returns_none_when_all_satisfied() {
        let dir = tempfile::tempdir().unwrap();
        let (engine, storage, sessions) = engine(&dir);
        let project_id = seed_project(&storage, dir.path());
        sessions.create("alpha-tpm-a", Path::new("/tmp/p"), "tpm").await.unwrap();
        std::fs::write(dir.path().join("specs/draft.md"), "done").unwrap();
        let mut config = sample_config();
        config.steps.truncate(1);

        let next = engine.next_gated_step(&project_id, &config, "alpha-tpm-a").await.unwrap();
        assert_eq!(next, None);
    }

    #[tokio::test]
    async fn gated_workflow_refuses_when_flag_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Arc::new(Storage::open(StoragePaths::at(dir.path())).unwrap());
        let sessions = Arc::new(FakeSessionAdapter::new());
        let engine = WorkflowEngine::new(storage.clone(), sessions.clone(), SequentialIdGen::new("task"), FakeClock::default(), EngineConfig::default());
        let project_id = seed_project(&storage, dir.path());
        sessions.create("alpha-tpm-a", Path::new("/tmp/p"), "tpm").await.unwrap();
        let config = sample_config();

        let err = engine.next_gated_step(&project_id, &config, "alpha-tpm-a").await.unwrap_err();
        assert!(matches!(err, EngineError::FeatureDisabled(_)));
    }
}
