// SPDX-License-Identifier: MIT

//! [`Storage`]: owns every snapshot file in the home directory and exposes
//! get/save/delete per entity (spec §3, §4.2). Each mutating method reads
//! the in-memory map, applies the change, and atomically rewrites the
//! backing file before returning — there is no separate "flush" step a
//! caller can forget.

use crate::error::StorageError;
use crate::paths::StoragePaths;
use crate::runtime_registry::RuntimeRegistry;
use crate::snapshot::{read_or_default, write_atomic};
use amx_core::delivery_log::{DeliveryLogId, MessageDeliveryLog};
use amx_core::project::{Project, ProjectId};
use amx_core::registry_entry::{InProgressTask, RegistryEntryId};
use amx_core::scheduled_message::{ScheduledMessage, ScheduledMessageId};
use amx_core::team::{Team, TeamId};
use amx_core::OrchestratorStatus;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(serde::Serialize, serde::Deserialize)]
struct Doc<T> {
    entries: HashMap<String, T>,
}

impl<T> Default for Doc<T> {
    fn default() -> Self {
        Self { entries: HashMap::new() }
    }
}

struct EntityStore<T: Clone + serde::Serialize + serde::de::DeserializeOwned> {
    path: PathBuf,
    entries: RwLock<HashMap<String, T>>,
}

impl<T: Clone + serde::Serialize + serde::de::DeserializeOwned> EntityStore<T> {
    fn load(path: PathBuf) -> Result<Self, StorageError> {
        let doc: Doc<T> = read_or_default(&path)?;
        Ok(Self {
            path,
            entries: RwLock::new(doc.entries),
        })
    }

    fn flush(&self) -> Result<(), StorageError> {
        let doc = Doc {
            entries: self.entries.read().clone(),
        };
        write_atomic(&self.path, &doc)
    }

    fn get(&self, id: &str) -> Option<T> {
        self.entries.read().get(id).cloned()
    }

    fn list(&self) -> Vec<T> {
        self.entries.read().values().cloned().collect()
    }

    fn save(&self, id: String, value: T) -> Result<(), StorageError> {
        self.entries.write().insert(id, value);
        self.flush()
    }

    fn delete(&self, id: &str) -> Result<bool, StorageError> {
        let removed = self.entries.write().remove(id).is_some();
        if removed {
            self.flush()?;
        }
        Ok(removed)
    }
}

/// The process-wide snapshot store. One instance per daemon/CLI process,
/// shared behind an `Arc` by `amx-api` and `amx-engine`.
pub struct Storage {
    teams: EntityStore<Team>,
    projects: EntityStore<Project>,
    scheduled_messages: EntityStore<ScheduledMessage>,
    delivery_log: EntityStore<MessageDeliveryLog>,
    in_progress_tasks: EntityStore<InProgressTask>,
    orchestrator_status: RwLock<OrchestratorStatus>,
    orchestrator_status_path: PathBuf,
    pub runtime: RuntimeRegistry,
    paths: StoragePaths,
}

impl Storage {
    pub fn open(paths: StoragePaths) -> Result<Self, StorageError> {
        let orchestrator_status_path = paths.orchestrator_status_file();
        let orchestrator_status = read_or_default(&orchestrator_status_path)?;
        let runtime = RuntimeRegistry::load(paths.runtime_pings_file())?;
        Ok(Self {
            teams: EntityStore::load(paths.teams_file())?,
            projects: EntityStore::load(paths.projects_file())?,
            scheduled_messages: EntityStore::load(paths.scheduled_messages_file())?,
            delivery_log: EntityStore::load(paths.delivery_log_file())?,
            in_progress_tasks: EntityStore::load(paths.registry_file())?,
            orchestrator_status: RwLock::new(orchestrator_status),
            orchestrator_status_path,
            runtime,
            paths,
        })
    }

    pub fn paths(&self) -> &StoragePaths {
        &self.paths
    }

    // --- teams ---

    pub fn get_team(&self, id: &TeamId) -> Option<Team> {
        self.teams.get(id.as_str())
    }

    pub fn list_teams(&self) -> Vec<Team> {
        let mut teams = self.teams.list();
        teams.sort_by(|a, b| a.id.cmp(&b.id));
        teams
    }

    pub fn save_team(&self, team: &Team) -> Result<(), StorageError> {
        self.teams.save(team.id.as_str().to_string(), team.clone())
    }

    pub fn delete_team(&self, id: &TeamId) -> Result<bool, StorageError> {
        self.teams.delete(id.as_str())
    }

    // --- projects ---

    pub fn get_project(&self, id: &ProjectId) -> Option<Project> {
        self.projects.get(id.as_str())
    }

    pub fn list_projects(&self) -> Vec<Project> {
        let mut projects = self.projects.list();
        projects.sort_by(|a, b| a.id.cmp(&b.id));
        projects
    }

    pub fn save_project(&self, project: &Project) -> Result<(), StorageError> {
        self.projects.save(project.id.as_str().to_string(), project.clone())
    }

    pub fn delete_project(&self, id: &ProjectId) -> Result<bool, StorageError> {
        self.projects.delete(id.as_str())
    }

    // --- scheduled messages ---

    pub fn get_scheduled_message(&self, id: &ScheduledMessageId) -> Option<ScheduledMessage> {
        self.scheduled_messages.get(id.as_str())
    }

    pub fn list_scheduled_messages(&self) -> Vec<ScheduledMessage> {
        self.scheduled_messages.list()
    }

    pub fn list_active_scheduled_messages(&self) -> Vec<ScheduledMessage> {
        self.scheduled_messages.list().into_iter().filter(|m| m.active).collect()
    }

    pub fn save_scheduled_message(&self, message: &ScheduledMessage) -> Result<(), StorageError> {
        self.scheduled_messages.save(message.id.as_str().to_string(), message.clone())
    }

    pub fn delete_scheduled_message(&self, id: &ScheduledMessageId) -> Result<bool, StorageError> {
        self.scheduled_messages.delete(id.as_str())
    }

    // --- delivery log ---

    pub fn append_delivery_log(&self, entry: &MessageDeliveryLog) -> Result<(), StorageError> {
        self.delivery_log.save(entry.id.as_str().to_string(), entry.clone())
    }

    pub fn list_delivery_log(&self) -> Vec<MessageDeliveryLog> {
        self.delivery_log.list()
    }

    pub fn list_delivery_log_for(&self, scheduled_message_id: &ScheduledMessageId) -> Vec<MessageDeliveryLog> {
        self.delivery_log
            .list()
            .into_iter()
            .filter(|l| &l.scheduled_message_id == scheduled_message_id)
            .collect()
    }

    // --- in-progress task registry ---

    pub fn get_registry_entry(&self, id: &RegistryEntryId) -> Option<InProgressTask> {
        self.in_progress_tasks.get(id.as_str())
    }

    pub fn list_registry_entries(&self) -> Vec<InProgressTask> {
        let mut entries = self.in_progress_tasks.list();
        entries.sort_by(|a, b| a.id.cmp(&b.id));
        entries
    }

    pub fn find_registry_entry_by_path(&self, task_file_path: &std::path::Path) -> Option<InProgressTask> {
        self.in_progress_tasks.list().into_iter().find(|e| e.task_file_path == task_file_path)
    }

    pub fn save_registry_entry(&self, entry: &InProgressTask) -> Result<(), StorageError> {
        self.in_progress_tasks.save(entry.id.as_str().to_string(), entry.clone())
    }

    pub fn delete_registry_entry(&self, id: &RegistryEntryId) -> Result<bool, StorageError> {
        self.in_progress_tasks.delete(id.as_str())
    }

    // --- orchestrator status ---

    pub fn get_orchestrator_status(&self) -> OrchestratorStatus {
        self.orchestrator_status.read().clone()
    }

    pub fn save_orchestrator_status(&self, status: OrchestratorStatus) -> Result<(), StorageError> {
        write_atomic(&self.orchestrator_status_path, &status)?;
        *self.orchestrator_status.write() = status;
        Ok(())
    }
}
