// SPDX-License-Identifier: MIT

//! tmux-backed session adapter. Shells out to the `tmux` binary for every
//! operation; this is the only code in the workspace that talks to the
//! external terminal multiplexer named in spec §6.

use super::{SessionAdapter, SessionError, SessionInfo};
use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;

#[derive(Clone, Default)]
pub struct TmuxSessionAdapter;

impl TmuxSessionAdapter {
    pub fn new() -> Self {
        Self
    }

    async fn has_session(&self, session_name: &str) -> bool {
        Command::new("tmux")
            .args(["has-session", "-t", session_name])
            .output()
            .await
            .map(|o| o.status.success())
            .unwrap_or(false)
    }
}

#[async_trait]
impl SessionAdapter for TmuxSessionAdapter {
    async fn create(&self, session_name: &str, project_path: &Path, _role: &str) -> Result<(), SessionError> {
        if !project_path.exists() {
            return Err(SessionError::SpawnFailed(format!(
                "project path does not exist: {}",
                project_path.display()
            )));
        }

        if self.has_session(session_name).await {
            tracing::warn!(session_name, "session already exists, killing first");
            let _ = Command::new("tmux")
                .args(["kill-session", "-t", session_name])
                .output()
                .await;
        }

        let output = Command::new("tmux")
            .args(["new-session", "-d", "-s", session_name, "-c"])
            .arg(project_path)
            .output()
            .await
            .map_err(|e| SessionError::SpawnFailed(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            tracing::error!(session_name, stderr = %stderr, "tmux new-session failed");
            return Err(SessionError::SpawnFailed(stderr));
        }

        Ok(())
    }

    async fn exists(&self, session_name: &str) -> Result<bool, SessionError> {
        Ok(self.has_session(session_name).await)
    }

    async fn list(&self) -> Result<Vec<SessionInfo>, SessionError> {
        let output = Command::new("tmux")
            .args(["list-sessions", "-F", "#{session_name}"])
            .output()
            .await
            .map_err(|e| SessionError::CommandFailed(e.to_string()))?;

        if !output.status.success() {
            // tmux exits non-zero with "no server running" when there are
            // no sessions at all — treat as an empty list, not an error.
            return Ok(Vec::new());
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout
            .lines()
            .filter(|l| !l.is_empty())
            .map(|name| SessionInfo {
                name: name.to_string(),
                alive: true,
            })
            .collect())
    }

    async fn kill(&self, session_name: &str) -> Result<bool, SessionError> {
        if !self.has_session(session_name).await {
            return Ok(false);
        }

        let output = Command::new("tmux")
            .args(["kill-session", "-t", session_name])
            .output()
            .await
            .map_err(|e| SessionError::CommandFailed(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            return Err(SessionError::CommandFailed(stderr));
        }

        Ok(true)
    }

    async fn capture_pane(&self, session_name: &str, lines: u32) -> Result<String, SessionError> {
        if !self.has_session(session_name).await {
            return Ok(String::new());
        }

        let start = format!("-{}", lines);
        let output = Command::new("tmux")
            .args(["capture-pane", "-t", session_name, "-p", "-S", &start])
            .output()
            .await
            .map_err(|e| SessionError::CommandFailed(e.to_string()))?;

        if !output.status.success() {
            return Ok(String::new());
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    async fn send_message(&self, session_name: &str, text: &str) -> Result<(), SessionError> {
        let output = Command::new("tmux")
            .args(["send-keys", "-t", session_name, "-l", text])
            .output()
            .await
            .map_err(|e| SessionError::CommandFailed(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            return Err(SessionError::CommandFailed(stderr));
        }

        Ok(())
    }

    async fn send_key(&self, session_name: &str, key: &str) -> Result<(), SessionError> {
        let output = Command::new("tmux")
            .args(["send-keys", "-t", session_name, key])
            .output()
            .await
            .map_err(|e| SessionError::CommandFailed(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            return Err(SessionError::CommandFailed(stderr));
        }

        Ok(())
    }
}
