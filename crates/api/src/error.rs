// SPDX-License-Identifier: MIT

//! API-local error type: wraps the component-local errors from every crate
//! `OrchestrationApi` composes over, converting each into [`AmxError`] at
//! this boundary (spec §7).

use amx_core::error::AmxError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Engine(#[from] amx_engine::EngineError),

    #[error(transparent)]
    Tasks(#[from] amx_tasks::TasksError),

    #[error(transparent)]
    Storage(#[from] amx_storage::StorageError),

    #[error(transparent)]
    Session(#[from] amx_adapters::session::SessionError),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },
}

impl ApiError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        ApiError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

impl From<ApiError> for AmxError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Engine(e) => e.into(),
            ApiError::Tasks(e) => e.into(),
            ApiError::Storage(e) => e.into(),
            ApiError::Session(e) => AmxError::SessionUnavailable(e.to_string()),
            ApiError::InvalidInput(msg) => AmxError::InvalidInput(msg),
            ApiError::NotFound { entity, id } => AmxError::not_found(entity, id),
        }
    }
}
