// SPDX-License-Identifier: MIT

//! Task transition operations (spec §4.9): `assignTask`, `completeTask`,
//! `blockTask`, `takeNextTask`, `syncTaskStatus`.

use crate::{ApiError, OrchestrationApi};
use amx_adapters::SessionAdapter;
use amx_core::clock::Clock;
use amx_core::id::IdGen;
use amx_core::project::ProjectId;
use amx_core::registry_entry::{InProgressTask, RegistryEntryId};
use amx_core::result::ApiResult;
use amx_core::role::Role;
use amx_core::status::{RegistryStatus, TaskFolderStatus};
use amx_core::task_frontmatter::Priority;
use amx_core::MemberId;
use amx_tasks::TaskFolderStore;

impl<A: SessionAdapter, C: Clock, G: IdGen + 'static> OrchestrationApi<A, C, G> {
    /// Move the task file from `open/` to `in_progress/` and register the
    /// assignment. Idempotent for repeated calls with identical parameters
    /// (spec §4.4, §4.9).
    #[allow(clippy::too_many_arguments)]
    pub fn assign_task(
        &self,
        project_id: &ProjectId,
        task_file_path: &std::path::Path,
        task_name: &str,
        role: Role,
        member_id: Option<MemberId>,
        session_id: Option<String>,
        priority: Priority,
    ) -> ApiResult<InProgressTask> {
        ApiResult::from_result(
            self.assign_task_inner(project_id, task_file_path, task_name, role, member_id, session_id, priority)
                .map_err(Into::into),
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn assign_task_inner(
        &self,
        project_id: &ProjectId,
        task_file_path: &std::path::Path,
        task_name: &str,
        role: Role,
        member_id: Option<MemberId>,
        session_id: Option<String>,
        priority: Priority,
    ) -> Result<InProgressTask, ApiError> {
        let project = self.storage.get_project(project_id).ok_or_else(|| ApiError::not_found("project", project_id.as_str()))?;
        let folder_store = TaskFolderStore::new();

        let (_milestone, status) = folder_store.parse_location(&project.tasks_dir(), task_file_path)?;
        let moved_path = if status == TaskFolderStatus::Open {
            folder_store.move_task_to_status(&project.tasks_dir(), task_file_path, TaskFolderStatus::InProgress)?
        } else {
            task_file_path.to_path_buf()
        };

        let entry = self.tasks.assign_task(project_id.clone(), moved_path, task_name, role, member_id, session_id, priority)?;
        Ok(entry)
    }

    /// Move the task file to `done/` and drop its registry entry — there is
    /// no "done" [`RegistryStatus`] variant, so completion removes the
    /// entry rather than updating its status (spec §4.4, §4.9).
    pub fn complete_task(&self, project_id: &ProjectId, entry_id: &RegistryEntryId) -> ApiResult<()> {
        ApiResult::from_result(self.complete_task_inner(project_id, entry_id).map_err(Into::into))
    }

    fn complete_task_inner(&self, project_id: &ProjectId, entry_id: &RegistryEntryId) -> Result<(), ApiError> {
        let project = self.storage.get_project(project_id).ok_or_else(|| ApiError::not_found("project", project_id.as_str()))?;
        let entry = self.storage.get_registry_entry(entry_id).ok_or_else(|| ApiError::not_found("task registry entry", entry_id.as_str()))?;

        let folder_store = TaskFolderStore::new();
        if entry.task_file_path.exists() {
            folder_store.move_task_to_status(&project.tasks_dir(), &entry.task_file_path, TaskFolderStatus::Done)?;
        }
        self.tasks.remove_task(entry_id)?;
        Ok(())
    }

    /// Move the task file to `blocked/` and mark the registry entry
    /// blocked with `reason` (spec §4.4, §4.9).
    pub fn block_task(&self, project_id: &ProjectId, entry_id: &RegistryEntryId, reason: impl Into<String>) -> ApiResult<InProgressTask> {
        ApiResult::from_result(self.block_task_inner(project_id, entry_id, reason.into()).map_err(Into::into))
    }

    fn block_task_inner(&self, project_id: &ProjectId, entry_id: &RegistryEntryId, reason: String) -> Result<InProgressTask, ApiError> {
        let project = self.storage.get_project(project_id).ok_or_else(|| ApiError::not_found("project", project_id.as_str()))?;
        let entry = self.storage.get_registry_entry(entry_id).ok_or_else(|| ApiError::not_found("task registry entry", entry_id.as_str()))?;

        let folder_store = TaskFolderStore::new();
        if entry.task_file_path.exists() {
            folder_store.move_task_to_status(&project.tasks_dir(), &entry.task_file_path, TaskFolderStatus::Blocked)?;
        }
        let updated = self.tasks.update_status(entry_id, RegistryStatus::Blocked, Some(reason))?;
        Ok(updated)
    }

    /// Claim the next open task matching `role`, falling back to any open
    /// task if none match, and assign it unclaimed (no member/session yet).
    /// Returns `None` when there is nothing open (spec §4.9).
    pub fn take_next_task(&self, project_id: &ProjectId, role: Role) -> ApiResult<Option<InProgressTask>> {
        ApiResult::from_result(self.take_next_task_inner(project_id, role).map_err(Into::into))
    }

    fn take_next_task_inner(&self, project_id: &ProjectId, role: Role) -> Result<Option<InProgressTask>, ApiError> {
        let project = self.storage.get_project(project_id).ok_or_else(|| ApiError::not_found("project", project_id.as_str()))?;
        let folder_store = TaskFolderStore::new();
        let open = folder_store.get_open_tasks(&project.tasks_dir())?;
        let chosen = match open.iter().find(|t| t.target_role == Some(role)).or_else(|| open.first()) {
            Some(t) => t,
            None => return Ok(None),
        };

        let moved_path = folder_store.move_task_to_status(&project.tasks_dir(), &chosen.path, TaskFolderStatus::InProgress)?;
        let entry = self.tasks.assign_task(
            project_id.clone(),
            moved_path,
            &chosen.title,
            chosen.target_role.unwrap_or(role),
            None,
            None,
            Priority::default(),
        )?;
        Ok(Some(entry))
    }

    /// Reconcile the registry against the on-disk task tree (spec §4.4
    /// `syncWithFileSystem`).
    pub fn sync_task_status(&self, project_id: &ProjectId) -> ApiResult<()> {
        ApiResult::from_result(self.sync_task_status_inner(project_id).map_err(Into::into))
    }

    fn sync_task_status_inner(&self, project_id: &ProjectId) -> Result<(), ApiError> {
        let project = self.storage.get_project(project_id).ok_or_else(|| ApiError::not_found("project", project_id.as_str()))?;
        self.tasks.sync_with_file_system(&project.tasks_dir(), project_id.clone())?;
        Ok(())
    }
}
