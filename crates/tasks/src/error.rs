// SPDX-License-Identifier: MIT

//! Task-tree local error type (spec §4.3, §4.4, §7).

use amx_core::error::AmxError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TasksError {
    #[error("path is not under a .agentmux/tasks/<milestone>/<status>/ folder: {0}")]
    InvalidPath(String),

    #[error("task move failed: {0}")]
    MoveFailed(String),

    #[error("frontmatter parse error: {0}")]
    FrontmatterParse(String),

    #[error("task not found: {0}")]
    NotFound(String),

    #[error("duplicate task file path: {0}")]
    DuplicatePath(String),

    #[error("storage error: {0}")]
    Storage(String),
}

impl From<amx_storage::StorageError> for TasksError {
    fn from(err: amx_storage::StorageError) -> Self {
        TasksError::Storage(err.to_string())
    }
}

impl From<TasksError> for AmxError {
    fn from(err: TasksError) -> Self {
        match err {
            TasksError::InvalidPath(msg) => AmxError::InvalidInput(msg),
            TasksError::MoveFailed(msg) => AmxError::MoveFailed(msg),
            TasksError::FrontmatterParse(msg) => AmxError::InvalidInput(msg),
            TasksError::NotFound(id) => AmxError::not_found("task", id),
            TasksError::DuplicatePath(path) => AmxError::Conflict(format!("task file path already registered: {path}")),
            TasksError::Storage(msg) => AmxError::StorageError(msg),
        }
    }
}
