// SPDX-License-Identifier: MIT

//! Engine-local error type (spec §4.5-§4.8, §7).

use amx_core::error::AmxError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("scheduled message not found: {0}")]
    MessageNotFound(String),

    #[error("session unavailable: {0}")]
    SessionUnavailable(String),

    #[error("escalation timed out for session {0}")]
    FailedToInitialize(String),

    #[error("session not found: {0}")]
    SessionNotFound(String),

    #[error("config not found: {0}")]
    ConfigNotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("step not found: {0}")]
    StepNotFound(String),

    #[error("feature disabled: {0}")]
    FeatureDisabled(String),

    #[error("storage error: {0}")]
    Storage(String),
}

impl From<amx_storage::StorageError> for EngineError {
    fn from(err: amx_storage::StorageError) -> Self {
        EngineError::Storage(err.to_string())
    }
}

impl From<amx_adapters::SessionError> for EngineError {
    fn from(err: amx_adapters::SessionError) -> Self {
        match err {
            amx_adapters::SessionError::NotFound(name) => EngineError::SessionNotFound(name),
            other => EngineError::SessionUnavailable(other.to_string()),
        }
    }
}

impl From<EngineError> for AmxError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::MessageNotFound(id) => AmxError::not_found("scheduled_message", id),
            EngineError::SessionNotFound(name) => AmxError::not_found("session", name),
            EngineError::ConfigNotFound(name) => AmxError::not_found("workflow_config", name),
            EngineError::Conflict(msg) => AmxError::Conflict(msg),
            EngineError::StepNotFound(id) => AmxError::not_found("workflow_step", id),
            EngineError::SessionUnavailable(msg) => AmxError::SessionUnavailable(msg),
            EngineError::FailedToInitialize(session) => AmxError::Timeout(format!("failed to initialize session {session}")),
            EngineError::FeatureDisabled(name) => AmxError::InvalidInput(format!("feature disabled: {name}")),
            EngineError::Storage(msg) => AmxError::StorageError(msg),
        }
    }
}
