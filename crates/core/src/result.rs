// SPDX-License-Identifier: MIT

//! The `{ok, message?, error?, data?}` envelope every `OrchestrationApi`
//! operation returns (spec §7, "User-visible").

use crate::error::AmxError;
use serde::{Deserialize, Serialize};

/// Uniform result envelope for API-facing operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResult<T> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            ok: true,
            message: None,
            error: None,
            data: Some(data),
        }
    }

    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: Some(message.into()),
            error: None,
            data: Some(data),
        }
    }

    pub fn err(error: AmxError) -> Self {
        Self {
            ok: false,
            message: None,
            error: Some(error.to_string()),
            data: None,
        }
    }

    pub fn from_result(result: Result<T, AmxError>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(err) => Self::err(err),
        }
    }
}

impl ApiResult<()> {
    pub fn success() -> Self {
        Self::ok(())
    }
}
