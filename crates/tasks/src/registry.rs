// SPDX-License-Identifier: MIT

//! [`TaskRegistry`]: the assignment registry over `InProgressTask` entries
//! (spec §4.4), backed by [`amx_storage::Storage`].

use crate::error::TasksError;
use crate::folder_store::TaskFolderStore;
use amx_core::clock::Clock;
use amx_core::id::IdGen;
use amx_core::project::ProjectId;
use amx_core::registry_entry::{InProgressTask, RegistryEntryId};
use amx_core::role::Role;
use amx_core::status::{RegistryStatus, TaskFolderStatus};
use amx_core::task_frontmatter::Priority;
use amx_core::MemberId;
use amx_storage::Storage;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct TaskRegistry<G: IdGen, C: Clock> {
    storage: Arc<Storage>,
    folder_store: TaskFolderStore,
    id_gen: G,
    clock: C,
}

impl<G: IdGen, C: Clock> TaskRegistry<G, C> {
    pub fn new(storage: Arc<Storage>, id_gen: G, clock: C) -> Self {
        Self {
            storage,
            folder_store: TaskFolderStore::new(),
            id_gen,
            clock,
        }
    }

    /// Assign a task to a member. Idempotent: a second call with identical
    /// `(task_file_path, task_name, role, member_id, session_id)` returns
    /// the existing entry unchanged; a call that reuses `task_file_path`
    /// with *different* parameters is a [`TasksError::DuplicatePath`]
    /// conflict, per the registry's "no two entries share taskFilePath"
    /// invariant.
    #[allow(clippy::too_many_arguments)]
    pub fn assign_task(
        &self,
        project_id: ProjectId,
        task_file_path: PathBuf,
        task_name: &str,
        role: Role,
        member_id: Option<MemberId>,
        session_id: Option<String>,
        priority: Priority,
    ) -> Result<InProgressTask, TasksError> {
        if let Some(existing) = self.storage.find_registry_entry_by_path(&task_file_path) {
            let unchanged = existing.task_name == task_name
                && existing.target_role == role
                && existing.assigned_member_id == member_id
                && existing.assigned_session_id == session_id;
            if unchanged {
                return Ok(existing);
            }
            return Err(TasksError::DuplicatePath(task_file_path.display().to_string()));
        }

        let entry = InProgressTask::new(
            RegistryEntryId::new(self.id_gen.next()),
            project_id,
            task_file_path,
            task_name,
            role,
            member_id,
            session_id,
            priority,
            &self.clock,
        );
        self.storage.save_registry_entry(&entry)?;
        Ok(entry)
    }

    pub fn update_status(&self, entry_id: &RegistryEntryId, status: RegistryStatus, block_reason: Option<String>) -> Result<InProgressTask, TasksError> {
        let mut entry = self
            .storage
            .get_registry_entry(entry_id)
            .ok_or_else(|| TasksError::NotFound(entry_id.as_str().to_string()))?;
        entry.status = status;
        entry.block_reason = block_reason;
        self.storage.save_registry_entry(&entry)?;
        Ok(entry)
    }

    pub fn remove_task(&self, entry_id: &RegistryEntryId) -> Result<bool, TasksError> {
        Ok(self.storage.delete_registry_entry(entry_id)?)
    }

    pub fn get_open_tasks(&self, tasks_dir: &Path) -> Result<Vec<crate::folder_store::TaskFileInfo>, TasksError> {
        self.folder_store.get_open_tasks(tasks_dir)
    }

    /// Reconcile the registry against the project's `.agentmux/tasks/**`
    /// tree (spec §4.4 `syncWithFileSystem`):
    ///   - entries whose file has moved to `done/` are removed
    ///   - entries whose file has vanished are dropped
    ///   - `in_progress/` files with no matching entry get a synthetic
    ///     entry in status `pending_assignment`
    pub fn sync_with_file_system(&self, tasks_dir: &Path, project_id: ProjectId) -> Result<(), TasksError> {
        let entries = self.storage.list_registry_entries();
        for entry in &entries {
            if !entry.task_file_path.exists() {
                self.storage.delete_registry_entry(&entry.id)?;
                continue;
            }
            let (_milestone, status) = self.folder_store.parse_location(tasks_dir, &entry.task_file_path)?;
            if status == TaskFolderStatus::Done {
                self.storage.delete_registry_entry(&entry.id)?;
            }
        }

        let in_progress_files = self.folder_store.list_tasks_in_status(tasks_dir, TaskFolderStatus::InProgress)?;
        for file in in_progress_files {
            if self.storage.find_registry_entry_by_path(&file.path).is_some() {
                continue;
            }
            let entry = InProgressTask::new(
                RegistryEntryId::new(self.id_gen.next()),
                project_id.clone(),
                file.path,
                file.title,
                file.target_role.unwrap_or(Role::Developer),
                None,
                None,
                Priority::default(),
                &self.clock,
            );
            let mut orphan = entry;
            orphan.status = RegistryStatus::PendingAssignment;
            self.storage.save_registry_entry(&orphan)?;
        }

        Ok(())
    }
}
