// SPDX-License-Identifier: MIT

//! No-op session adapter for dry-run / disabled configurations.

use super::{SessionAdapter, SessionError, SessionInfo};
use async_trait::async_trait;
use std::path::Path;

#[derive(Clone, Copy, Default)]
pub struct NoopSessionAdapter;

#[async_trait]
impl SessionAdapter for NoopSessionAdapter {
    async fn create(&self, _session_name: &str, _project_path: &Path, _role: &str) -> Result<(), SessionError> {
        Ok(())
    }

    async fn exists(&self, _session_name: &str) -> Result<bool, SessionError> {
        Ok(false)
    }

    async fn list(&self) -> Result<Vec<SessionInfo>, SessionError> {
        Ok(Vec::new())
    }

    async fn kill(&self, _session_name: &str) -> Result<bool, SessionError> {
        Ok(false)
    }

    async fn capture_pane(&self, _session_name: &str, _lines: u32) -> Result<String, SessionError> {
        Ok(String::new())
    }

    async fn send_message(&self, _session_name: &str, _text: &str) -> Result<(), SessionError> {
        Ok(())
    }

    async fn send_key(&self, _session_name: &str, _key: &str) -> Result<(), SessionError> {
        Ok(())
    }
}
