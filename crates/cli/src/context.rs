// SPDX-License-Identifier: MIT

//! Builds the in-process [`OrchestrationApi`] the CLI drives. There is no
//! daemon socket to dial: `amx` opens the same `Storage` root the running
//! `amxd` process (if any) uses and talks to it directly (spec §2, §6).

use amx_api::OrchestrationApi;
use amx_core::clock::SystemClock;
use amx_core::id::UuidIdGen;
use amx_daemon::startup::AnySessionAdapter;
use amx_engine::EngineConfig;
use amx_storage::{Storage, StoragePaths};
use std::sync::Arc;

pub type CliApi = OrchestrationApi<AnySessionAdapter, SystemClock, UuidIdGen>;

pub fn build() -> anyhow::Result<CliApi> {
    let paths = StoragePaths::resolve()?;
    let storage = Arc::new(Storage::open(paths)?);
    let sessions = Arc::new(AnySessionAdapter::from_env());
    Ok(OrchestrationApi::new(storage, sessions, SystemClock, UuidIdGen, EngineConfig::from_env()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn build_opens_storage_under_agentmux_home() {
        let dir = tempfile::tempdir().unwrap();
        std::env::set_var("AGENTMUX_HOME", dir.path());
        std::env::set_var("AGENTMUX_DRY_RUN", "1");
        let api = build().unwrap();
        assert!(api.storage().list_teams().is_empty());
        std::env::remove_var("AGENTMUX_HOME");
        std::env::remove_var("AGENTMUX_DRY_RUN");
    }
}
