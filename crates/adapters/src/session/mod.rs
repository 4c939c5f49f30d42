// SPDX-License-Identifier: MIT

//! Session management adapters (spec §4.1, §6 "Session control").

mod noop;
mod tmux;

pub use noop::NoopSessionAdapter;
pub use tmux::TmuxSessionAdapter;

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeSession, FakeSessionAdapter, SessionCall};

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// Errors from session operations. Per spec §4.1, failures are reported as
/// `{ok:false, err}` rather than thrown — `SessionAdapter` methods return
/// `Result`, and callers in `amx-engine`/`amx-api` fold these into
/// `AmxError::SessionUnavailable`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("session not found: {0}")]
    NotFound(String),
    #[error("spawn failed: {0}")]
    SpawnFailed(String),
    #[error("command failed: {0}")]
    CommandFailed(String),
}

/// A session as reported by `list()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    pub name: String,
    pub alive: bool,
}

/// Adapter for managing terminal sessions (tmux, etc.). Exposes exactly the
/// primitives spec §4.1 lists: `create`/`createOrchestrator`, `exists`,
/// `list`, `kill`, `capturePane`, `sendMessage`, `sendKey`.
///
/// `sendMessage` and `sendKey` are kept as two distinct primitives (spec §9
/// Design Notes: "Broadcast send message + press Enter") — composing them
/// is the caller's job, not the adapter's.
#[async_trait]
pub trait SessionAdapter: Send + Sync + 'static {
    /// Create a session for a role-typed member. `kill` on a missing
    /// session is success with a `notFound` marker, not an error — modeled
    /// here via `Ok(false)` from [`SessionAdapter::kill`].
    async fn create(&self, session_name: &str, project_path: &Path, role: &str) -> Result<(), SessionError>;

    /// Create the singleton orchestrator session. The caller (Supervisor)
    /// is responsible for refusing a second orchestrator (spec §4.6); the
    /// adapter itself has no notion of singletons.
    async fn create_orchestrator(&self, session_name: &str, project_path: &Path) -> Result<(), SessionError> {
        self.create(session_name, project_path, "orchestrator").await
    }

    async fn exists(&self, session_name: &str) -> Result<bool, SessionError>;

    async fn list(&self) -> Result<Vec<SessionInfo>, SessionError>;

    /// Returns `Ok(false)` ("notFound" marker) when the session did not
    /// exist; `Ok(true)` when a live session was killed.
    async fn kill(&self, session_name: &str) -> Result<bool, SessionError>;

    /// Capture the last `lines` lines of pane output. Returns an empty
    /// string (not an error) for a missing session (spec §8 boundary
    /// behavior).
    async fn capture_pane(&self, session_name: &str, lines: u32) -> Result<String, SessionError>;

    /// Deliver text so it appears at the session's input prompt. Callers
    /// typically follow with `send_key("Enter")` to commit.
    async fn send_message(&self, session_name: &str, text: &str) -> Result<(), SessionError>;

    async fn send_key(&self, session_name: &str, key: &str) -> Result<(), SessionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_error_display_includes_detail() {
        let err = SessionError::NotFound("alpha-dev-a".into());
        assert_eq!(err.to_string(), "session not found: alpha-dev-a");
    }
}
