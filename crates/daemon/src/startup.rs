// SPDX-License-Identifier: MIT

//! Daemon construction and shutdown (spec §9 "process topology"): wires
//! storage, the session adapter, and every engine component into one
//! [`OrchestrationApi`], starts the Activity Monitor loop, and re-arms any
//! scheduled messages left active from a previous run.

use amx_adapters::session::{NoopSessionAdapter, SessionAdapter, SessionError, SessionInfo, TmuxSessionAdapter};
use amx_api::OrchestrationApi;
use amx_core::clock::SystemClock;
use amx_core::id::UuidIdGen;
use amx_engine::{ActivityMonitor, EngineConfig};
use amx_storage::{Storage, StorageError, StoragePaths};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::info;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Dispatches to a real `tmux`-backed adapter or a no-op one, chosen once at
/// startup via `AGENTMUX_DRY_RUN` (spec §6 configuration surface). A single
/// concrete adapter type lets the rest of the daemon stay generic over
/// [`SessionAdapter`] without picking a session backend at compile time.
#[derive(Clone)]
pub enum AnySessionAdapter {
    Tmux(TmuxSessionAdapter),
    Noop(NoopSessionAdapter),
}

impl AnySessionAdapter {
    pub fn from_env() -> Self {
        let dry_run = std::env::var("AGENTMUX_DRY_RUN").map(|v| v == "1" || v.eq_ignore_ascii_case("true")).unwrap_or(false);
        if dry_run {
            AnySessionAdapter::Noop(NoopSessionAdapter)
        } else {
            AnySessionAdapter::Tmux(TmuxSessionAdapter::new())
        }
    }
}

#[async_trait]
impl SessionAdapter for AnySessionAdapter {
    async fn create(&self, session_name: &str, project_path: &Path, role: &str) -> Result<(), SessionError> {
        match self {
            AnySessionAdapter::Tmux(a) => a.create(session_name, project_path, role).await,
            AnySessionAdapter::Noop(a) => a.create(session_name, project_path, role).await,
        }
    }

    async fn exists(&self, session_name: &str) -> Result<bool, SessionError> {
        match self {
            AnySessionAdapter::Tmux(a) => a.exists(session_name).await,
            AnySessionAdapter::Noop(a) => a.exists(session_name).await,
        }
    }

    async fn list(&self) -> Result<Vec<SessionInfo>, SessionError> {
        match self {
            AnySessionAdapter::Tmux(a) => a.list().await,
            AnySessionAdapter::Noop(a) => a.list().await,
        }
    }

    async fn kill(&self, session_name: &str) -> Result<bool, SessionError> {
        match self {
            AnySessionAdapter::Tmux(a) => a.kill(session_name).await,
            AnySessionAdapter::Noop(a) => a.kill(session_name).await,
        }
    }

    async fn capture_pane(&self, session_name: &str, lines: u32) -> Result<String, SessionError> {
        match self {
            AnySessionAdapter::Tmux(a) => a.capture_pane(session_name, lines).await,
            AnySessionAdapter::Noop(a) => a.capture_pane(session_name, lines).await,
        }
    }

    async fn send_message(&self, session_name: &str, text: &str) -> Result<(), SessionError> {
        match self {
            AnySessionAdapter::Tmux(a) => a.send_message(session_name, text).await,
            AnySessionAdapter::Noop(a) => a.send_message(session_name, text).await,
        }
    }

    async fn send_key(&self, session_name: &str, key: &str) -> Result<(), SessionError> {
        match self {
            AnySessionAdapter::Tmux(a) => a.send_key(session_name, key).await,
            AnySessionAdapter::Noop(a) => a.send_key(session_name, key).await,
        }
    }
}

/// The long-running process: an [`OrchestrationApi`] plus the background
/// loops it needs kept alive (spec §9). Construction order matters: storage
/// must be open and the API built before re-arming schedules or starting the
/// Activity Monitor, since both read from it.
pub struct Daemon<A: SessionAdapter, C: amx_core::clock::Clock, G: amx_core::id::IdGen + 'static> {
    pub api: Arc<OrchestrationApi<A, C, G>>,
    activity_handle: JoinHandle<()>,
}

impl Daemon<AnySessionAdapter, SystemClock, UuidIdGen> {
    /// Build the production daemon: `StoragePaths::resolve()` for the home
    /// directory, `AnySessionAdapter::from_env()` for the session backend,
    /// real wall-clock time and UUIDv4 ids.
    pub fn start() -> Result<Self, StartupError> {
        let paths = StoragePaths::resolve()?;
        let storage = Arc::new(Storage::open(paths)?);
        let sessions = Arc::new(AnySessionAdapter::from_env());
        Self::start_with(storage, sessions, SystemClock, UuidIdGen, EngineConfig::from_env())
    }
}

impl<A: SessionAdapter, C: amx_core::clock::Clock, G: amx_core::id::IdGen + 'static> Daemon<A, C, G> {
    /// Build a daemon over explicit components — the seam tests use to
    /// substitute `FakeSessionAdapter`/`FakeClock`/`SequentialIdGen`.
    pub fn start_with(storage: Arc<Storage>, sessions: Arc<A>, clock: C, id_gen: G, config: EngineConfig) -> Result<Self, StartupError> {
        let api = Arc::new(OrchestrationApi::new(storage, sessions, clock, id_gen, config));

        api.scheduler().rearm_all();
        info!("rearmed scheduled messages from storage");

        let monitor = ActivityMonitor::new(
            api.storage().clone(),
            api.sessions().clone(),
            api.clock().clone(),
            api.config().clone(),
            api.member_locks().clone(),
        );
        let activity_handle = monitor.spawn();
        info!("activity monitor started");

        Ok(Self { api, activity_handle })
    }

    /// Stop the background loops. Scheduled-message tasks are independently
    /// owned by the `Scheduler` and outlive this call, matching the
    /// teacher's pattern of shutting down the supervised loops explicitly
    /// while letting already-armed timers drain naturally.
    pub fn shutdown(self) {
        self.activity_handle.abort();
        info!("activity monitor stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amx_adapters::session::FakeSessionAdapter;
    use amx_core::clock::FakeClock;
    use amx_core::id::SequentialIdGen;

    #[tokio::test]
    async fn start_with_rearms_and_spawns_monitor_without_panicking() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Arc::new(Storage::open(StoragePaths::at(dir.path())).unwrap());
        let sessions = Arc::new(FakeSessionAdapter::new());
        let daemon = Daemon::start_with(storage, sessions, FakeClock::default(), SequentialIdGen::new("id"), EngineConfig::default()).unwrap();
        daemon.shutdown();
    }
}
