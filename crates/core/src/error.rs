// SPDX-License-Identifier: MIT

//! Surface-level error kinds shared across the orchestration core (spec §7).

use thiserror::Error;

/// The single error type returned by `OrchestrationApi` operations.
///
/// Component-local crates (`amx-storage`, `amx-adapters`, `amx-tasks`)
/// define their own smaller `thiserror` enums and convert into this one at
/// the API boundary, rather than every leaf crate depending on this type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AmxError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("session unavailable: {0}")]
    SessionUnavailable(String),

    #[error("timed out: {0}")]
    Timeout(String),

    #[error("task move failed: {0}")]
    MoveFailed(String),

    #[error("delivery failed: {0}")]
    DeliveryFailed(String),

    #[error("storage error: {0}")]
    StorageError(String),
}

impl AmxError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        AmxError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Short machine-readable kind tag, useful for API responses / logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AmxError::NotFound { .. } => "not_found",
            AmxError::Conflict(_) => "conflict",
            AmxError::InvalidInput(_) => "invalid_input",
            AmxError::SessionUnavailable(_) => "session_unavailable",
            AmxError::Timeout(_) => "timeout",
            AmxError::MoveFailed(_) => "move_failed",
            AmxError::DeliveryFailed(_) => "delivery_failed",
            AmxError::StorageError(_) => "storage_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_formats_entity_and_id() {
        let err = AmxError::not_found("team", "t-1");
        assert_eq!(err.to_string(), "team not found: t-1");
        assert_eq!(err.kind(), "not_found");
    }

    #[test]
    fn kind_is_stable_per_variant() {
        assert_eq!(AmxError::Conflict("x".into()).kind(), "conflict");
        assert_eq!(AmxError::Timeout("x".into()).kind(), "timeout");
    }
}
