// SPDX-License-Identifier: MIT

//! [`TaskFolderStore`]: on-disk state machine for task markdown files
//! across `open/in_progress/done/blocked` folders per milestone (spec §4.3).

use crate::error::TasksError;
use crate::frontmatter;
use amx_core::role::Role;
use amx_core::status::TaskFolderStatus;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// A task file located during a folder scan, with just enough parsed
/// frontmatter to drive assignment decisions (spec §4.3 "enumerate tasks
/// per status").
#[derive(Debug, Clone, PartialEq)]
pub struct TaskFileInfo {
    pub path: PathBuf,
    pub milestone_id: String,
    pub status: TaskFolderStatus,
    pub id: String,
    pub title: String,
    pub target_role: Option<Role>,
}

fn milestone_pattern() -> Regex {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"^m\d+_.*$").unwrap()
}

pub struct TaskFolderStore;

impl TaskFolderStore {
    pub fn new() -> Self {
        Self
    }

    /// Create the four status folders for `milestone_id` under `tasks_dir`
    /// if they don't already exist.
    pub fn ensure_milestone_folders(&self, tasks_dir: &Path, milestone_id: &str) -> Result<(), TasksError> {
        let milestone_dir = tasks_dir.join(milestone_id);
        for status in TaskFolderStatus::ALL {
            fs::create_dir_all(milestone_dir.join(status.folder_name()))
                .map_err(|e| TasksError::MoveFailed(e.to_string()))?;
        }
        Ok(())
    }

    /// Parse `<project>/.agentmux/tasks/<milestone>/<status>/<file>.md`
    /// into its milestone and status components (spec §4.3 step 1).
    pub fn parse_location(&self, tasks_dir: &Path, path: &Path) -> Result<(String, TaskFolderStatus), TasksError> {
        let relative = path.strip_prefix(tasks_dir).map_err(|_| {
            TasksError::InvalidPath(path.display().to_string())
        })?;
        let mut components = relative.components();
        let milestone = components
            .next()
            .and_then(|c| c.as_os_str().to_str())
            .ok_or_else(|| TasksError::InvalidPath(path.display().to_string()))?;
        if !milestone_pattern().is_match(milestone) {
            return Err(TasksError::InvalidPath(path.display().to_string()));
        }
        let status_name = components
            .next()
            .and_then(|c| c.as_os_str().to_str())
            .ok_or_else(|| TasksError::InvalidPath(path.display().to_string()))?;
        let status = TaskFolderStatus::parse(status_name).ok_or_else(|| TasksError::InvalidPath(path.display().to_string()))?;
        Ok((milestone.to_string(), status))
    }

    /// Move a task file to `target_status`, creating the target folder if
    /// needed and verifying the move landed (spec §4.3 steps 1-3).
    pub fn move_task_to_status(&self, tasks_dir: &Path, current_path: &Path, target_status: TaskFolderStatus) -> Result<PathBuf, TasksError> {
        let (milestone, _current_status) = self.parse_location(tasks_dir, current_path)?;
        let file_name = current_path
            .file_name()
            .ok_or_else(|| TasksError::InvalidPath(current_path.display().to_string()))?;

        if !current_path.exists() {
            return Err(TasksError::NotFound(current_path.display().to_string()));
        }

        let target_dir = tasks_dir.join(&milestone).join(target_status.folder_name());
        fs::create_dir_all(&target_dir).map_err(|e| TasksError::MoveFailed(e.to_string()))?;
        let target_path = target_dir.join(file_name);

        fs::rename(current_path, &target_path).map_err(|e| TasksError::MoveFailed(e.to_string()))?;

        if !target_path.exists() {
            return Err(TasksError::MoveFailed(format!("move did not land: {}", target_path.display())));
        }

        Ok(target_path)
    }

    /// Enumerate task files under every milestone's `<status>/` folder,
    /// ordered by milestone directory name then filename (spec §4.3).
    pub fn list_tasks_in_status(&self, tasks_dir: &Path, status: TaskFolderStatus) -> Result<Vec<TaskFileInfo>, TasksError> {
        let mut milestones: Vec<String> = fs::read_dir(tasks_dir)
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .filter(|e| e.path().is_dir())
                    .filter_map(|e| e.file_name().to_str().map(str::to_string))
                    .filter(|name| milestone_pattern().is_match(name))
                    .collect()
            })
            .unwrap_or_default();
        milestones.sort();

        let mut infos = Vec::new();
        for milestone in milestones {
            let status_dir = tasks_dir.join(&milestone).join(status.folder_name());
            let Ok(entries) = fs::read_dir(&status_dir) else { continue };
            let mut files: Vec<PathBuf> = entries
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("md"))
                .collect();
            files.sort();

            for path in files {
                let content = fs::read_to_string(&path).map_err(|e| TasksError::MoveFailed(e.to_string()))?;
                let (fm, _body) = frontmatter::parse(&content)?;
                infos.push(TaskFileInfo {
                    path,
                    milestone_id: milestone.clone(),
                    status,
                    id: fm.id,
                    title: fm.title,
                    target_role: fm.target_role,
                });
            }
        }
        Ok(infos)
    }

    /// All tasks currently in `open/`, across every milestone, ordered by
    /// milestone then filename (spec §4.3 `getOpenTasks`).
    pub fn get_open_tasks(&self, tasks_dir: &Path) -> Result<Vec<TaskFileInfo>, TasksError> {
        self.list_tasks_in_status(tasks_dir, TaskFolderStatus::Open)
    }
}

impl Default for TaskFolderStore {
    fn default() -> Self {
        Self::new()
    }
}
