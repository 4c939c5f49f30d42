// SPDX-License-Identifier: MIT

//! In-memory session adapter for tests.

use super::{SessionAdapter, SessionError, SessionInfo};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A recorded adapter call, for assertions in supervisor/scheduler tests.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCall {
    Create { name: String, cwd: PathBuf, role: String },
    Exists { name: String },
    List,
    Kill { name: String },
    CapturePane { name: String, lines: u32 },
    SendMessage { name: String, text: String },
    SendKey { name: String, key: String },
}

#[derive(Debug, Clone)]
pub struct FakeSession {
    pub cwd: PathBuf,
    pub role: String,
    pub output_lines: Vec<String>,
    pub alive: bool,
}

struct FakeSessionState {
    sessions: HashMap<String, FakeSession>,
    calls: Vec<SessionCall>,
}

/// Fake session adapter for testing. Sessions are keyed by the caller's
/// requested session name (unlike the tmux adapter, which namespaces names
/// under its own prefix) since tests assert on the names the Supervisor
/// constructs.
#[derive(Clone)]
pub struct FakeSessionAdapter {
    inner: Arc<Mutex<FakeSessionState>>,
}

impl Default for FakeSessionAdapter {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeSessionState {
                sessions: HashMap::new(),
                calls: Vec::new(),
            })),
        }
    }
}

impl FakeSessionAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<SessionCall> {
        self.inner.lock().calls.clone()
    }

    pub fn get_session(&self, name: &str) -> Option<FakeSession> {
        self.inner.lock().sessions.get(name).cloned()
    }

    /// Replace a session's captured output, as if new pane activity had
    /// occurred (drives Activity Monitor tests).
    pub fn set_output(&self, name: &str, lines: Vec<String>) {
        if let Some(session) = self.inner.lock().sessions.get_mut(name) {
            session.output_lines = lines;
        }
    }

    /// Simulate the underlying process/session dying out from under us.
    pub fn kill_externally(&self, name: &str) {
        if let Some(session) = self.inner.lock().sessions.get_mut(name) {
            session.alive = false;
        }
    }

    /// Seed a session directly without going through `create`, for tests
    /// that want to start from an already-live session.
    pub fn seed_session(&self, name: &str, cwd: impl Into<PathBuf>, role: &str) {
        self.inner.lock().sessions.insert(
            name.to_string(),
            FakeSession {
                cwd: cwd.into(),
                role: role.to_string(),
                output_lines: Vec::new(),
                alive: true,
            },
        );
    }
}

#[async_trait]
impl SessionAdapter for FakeSessionAdapter {
    async fn create(&self, session_name: &str, project_path: &Path, role: &str) -> Result<(), SessionError> {
        let mut inner = self.inner.lock();
        inner.calls.push(SessionCall::Create {
            name: session_name.to_string(),
            cwd: project_path.to_path_buf(),
            role: role.to_string(),
        });
        inner.sessions.insert(
            session_name.to_string(),
            FakeSession {
                cwd: project_path.to_path_buf(),
                role: role.to_string(),
                output_lines: Vec::new(),
                alive: true,
            },
        );
        Ok(())
    }

    async fn exists(&self, session_name: &str) -> Result<bool, SessionError> {
        let mut inner = self.inner.lock();
        inner.calls.push(SessionCall::Exists {
            name: session_name.to_string(),
        });
        Ok(inner.sessions.get(session_name).map(|s| s.alive).unwrap_or(false))
    }

    async fn list(&self) -> Result<Vec<SessionInfo>, SessionError> {
        let mut inner = self.inner.lock();
        inner.calls.push(SessionCall::List);
        Ok(inner
            .sessions
            .iter()
            .map(|(name, s)| SessionInfo {
                name: name.clone(),
                alive: s.alive,
            })
            .collect())
    }

    async fn kill(&self, session_name: &str) -> Result<bool, SessionError> {
        let mut inner = self.inner.lock();
        inner.calls.push(SessionCall::Kill {
            name: session_name.to_string(),
        });
        match inner.sessions.remove(session_name) {
            Some(_) => Ok(true),
            None => Ok(false),
        }
    }

    async fn capture_pane(&self, session_name: &str, lines: u32) -> Result<String, SessionError> {
        let mut inner = self.inner.lock();
        inner.calls.push(SessionCall::CapturePane {
            name: session_name.to_string(),
            lines,
        });
        match inner.sessions.get(session_name) {
            Some(session) => {
                let start = session.output_lines.len().saturating_sub(lines as usize);
                Ok(session.output_lines[start..].join("\n"))
            }
            None => Ok(String::new()),
        }
    }

    async fn send_message(&self, session_name: &str, text: &str) -> Result<(), SessionError> {
        let mut inner = self.inner.lock();
        inner.calls.push(SessionCall::SendMessage {
            name: session_name.to_string(),
            text: text.to_string(),
        });
        if !inner.sessions.contains_key(session_name) {
            return Err(SessionError::NotFound(session_name.to_string()));
        }
        Ok(())
    }

    async fn send_key(&self, session_name: &str, key: &str) -> Result<(), SessionError> {
        let mut inner = self.inner.lock();
        inner.calls.push(SessionCall::SendKey {
            name: session_name.to_string(),
            key: key.to_string(),
        });
        if !inner.sessions.contains_key(session_name) {
            return Err(SessionError::NotFound(session_name.to_string()));
        }
        Ok(())
    }
}
