// SPDX-License-Identifier: MIT

//! Centralized environment variable access for the daemon binary (spec §6).

use std::path::PathBuf;

/// Resolve the log directory: `AGENTMUX_HOME`/logs, falling back to
/// `~/.agentmux/logs` when the home directory cannot be resolved from the
/// environment (mirrors [`amx_storage::StoragePaths::resolve`]'s own
/// fallback chain, kept separate so log placement doesn't require opening
/// storage first).
pub fn log_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("AGENTMUX_HOME") {
        return PathBuf::from(dir).join("logs");
    }
    dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".agentmux").join("logs")
}

/// `AGENTMUX_WEB_PORT` (spec §6), not currently bound by this process but
/// read and logged so the daemon's startup banner reflects the configured
/// external transport port even though this crate doesn't host it.
pub fn web_port() -> Option<u16> {
    std::env::var("AGENTMUX_WEB_PORT").ok().and_then(|v| v.parse().ok())
}

/// `AGENTMUX_MCP_PORT` (spec §6), read for the same reason as [`web_port`].
pub fn mcp_port() -> Option<u16> {
    std::env::var("AGENTMUX_MCP_PORT").ok().and_then(|v| v.parse().ok())
}
