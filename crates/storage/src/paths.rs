// SPDX-License-Identifier: MIT

//! Resolves the on-disk home directory and the per-entity snapshot file
//! paths under it (spec §4.2, §6).
//!
//! Defaults to `~/.agentmux`; overridable with `AGENTMUX_HOME` so tests and
//! the daemon's `--home` flag can point at an isolated directory.

use crate::error::StorageError;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct StoragePaths {
    home: PathBuf,
}

impl StoragePaths {
    pub fn resolve() -> Result<Self, StorageError> {
        if let Ok(dir) = std::env::var("AGENTMUX_HOME") {
            return Ok(Self { home: PathBuf::from(dir) });
        }
        let home = dirs::home_dir().ok_or(StorageError::NoHome)?.join(".agentmux");
        Ok(Self { home })
    }

    pub fn at(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn teams_file(&self) -> PathBuf {
        self.home.join("teams.json")
    }

    pub fn projects_file(&self) -> PathBuf {
        self.home.join("projects.json")
    }

    pub fn scheduled_messages_file(&self) -> PathBuf {
        self.home.join("scheduled_messages.json")
    }

    pub fn delivery_log_file(&self) -> PathBuf {
        self.home.join("delivery_log.json")
    }

    pub fn registry_file(&self) -> PathBuf {
        self.home.join("in_progress_registry.json")
    }

    pub fn orchestrator_status_file(&self) -> PathBuf {
        self.home.join("orchestrator_status.json")
    }

    pub fn runtime_pings_file(&self) -> PathBuf {
        self.home.join("runtime_pings.json")
    }
}
