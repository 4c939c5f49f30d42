// SPDX-License-Identifier: MIT

//! Output formatting shared by every command: text (human) or JSON
//! (scripting), mirroring the `{ok, message, error, data}` envelope every
//! `OrchestrationApi` operation already returns.

use amx_core::ApiResult;
use clap::ValueEnum;
use serde::Serialize;

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Render an `ApiResult` and translate a non-`ok` result into a process
/// exit error, so callers can just `?` this from their command handler.
pub fn render<T: Serialize>(result: ApiResult<T>, format: OutputFormat, on_ok: impl FnOnce(&T)) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Text => {
            if result.ok {
                if let Some(data) = &result.data {
                    on_ok(data);
                }
                if let Some(message) = &result.message {
                    println!("{message}");
                }
            }
        }
    }
    if !result.ok {
        anyhow::bail!(result.error.unwrap_or_else(|| "operation failed".to_string()));
    }
    Ok(())
}
