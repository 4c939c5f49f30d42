// SPDX-License-Identifier: MIT

//! Storage-local error type (spec §4.2).

use amx_core::error::AmxError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error at {path}: {source}")]
    Io { path: String, source: std::io::Error },

    #[error("corrupt snapshot at {path}: {source}")]
    Corrupt { path: String, source: serde_json::Error },

    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    #[error("duplicate task file path: {0}")]
    DuplicatePath(String),

    #[error("home directory could not be resolved")]
    NoHome,
}

impl From<StorageError> for AmxError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { entity, id } => AmxError::not_found(entity, id),
            StorageError::DuplicatePath(path) => AmxError::Conflict(format!("task file path already registered: {path}")),
            other => AmxError::StorageError(other.to_string()),
        }
    }
}
