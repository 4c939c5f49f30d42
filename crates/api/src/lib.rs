// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! amx-api: the Orchestration API (C9) — the cross-component invariant
//! boundary. Every handler takes an explicit [`OrchestrationApi`] context
//! (spec §9 Design Notes: "pass a context/handle explicitly into
//! handlers"); there is no global service instance.

pub mod error;
pub mod tasks;
pub mod teams;

pub use error::ApiError;

use amx_adapters::SessionAdapter;
use amx_core::clock::Clock;
use amx_core::id::IdGen;
use amx_engine::{EngineConfig, MemberLocks, Scheduler, Supervisor, WorkflowEngine};
use amx_storage::Storage;
use amx_tasks::TaskRegistry;
use std::sync::Arc;

/// Explicit context handle threaded through every API operation. Owns no
/// process-wide state beyond what's passed in at construction (spec §9).
pub struct OrchestrationApi<A: SessionAdapter, C: Clock, G: IdGen + 'static> {
    pub(crate) storage: Arc<Storage>,
    pub(crate) sessions: Arc<A>,
    pub(crate) clock: C,
    pub(crate) id_gen: G,
    pub(crate) config: EngineConfig,
    pub(crate) scheduler: Arc<Scheduler<A, C, G>>,
    pub(crate) supervisor: Arc<Supervisor<A, C>>,
    pub(crate) tasks: TaskRegistry<G, C>,
    pub(crate) workflow: WorkflowEngine<A, G, C>,
    pub(crate) member_locks: Arc<MemberLocks>,
}

impl<A: SessionAdapter, C: Clock, G: IdGen + 'static> OrchestrationApi<A, C, G> {
    pub fn new(storage: Arc<Storage>, sessions: Arc<A>, clock: C, id_gen: G, config: EngineConfig) -> Self {
        let member_locks = Arc::new(MemberLocks::new());
        let scheduler = Scheduler::new(storage.clone(), sessions.clone(), clock.clone(), id_gen.clone());
        let supervisor = Supervisor::new(storage.clone(), sessions.clone(), clock.clone(), config.clone(), member_locks.clone());
        let tasks = TaskRegistry::new(storage.clone(), id_gen.clone(), clock.clone());
        let workflow = WorkflowEngine::new(storage.clone(), sessions.clone(), id_gen.clone(), clock.clone(), config.clone());
        Self {
            storage,
            sessions,
            clock,
            id_gen,
            config,
            scheduler,
            supervisor,
            tasks,
            workflow,
            member_locks,
        }
    }

    pub fn scheduler(&self) -> &Arc<Scheduler<A, C, G>> {
        &self.scheduler
    }

    pub fn workflow(&self) -> &WorkflowEngine<A, G, C> {
        &self.workflow
    }

    pub fn storage(&self) -> &Arc<Storage> {
        &self.storage
    }

    pub fn sessions(&self) -> &Arc<A> {
        &self.sessions
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn member_locks(&self) -> &Arc<MemberLocks> {
        &self.member_locks
    }

    pub fn id_gen(&self) -> &G {
        &self.id_gen
    }
}
