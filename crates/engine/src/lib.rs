// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! amx-engine: the Scheduler (C5), Agent Supervisor (C6), Activity Monitor
//! (C7), and Workflow Engine (C8) — the asynchronous core that drives
//! agent sessions (spec §4.5-§4.8).

pub mod activity_monitor;
pub mod config;
pub mod error;
pub mod member_lock;
pub mod scheduler;
pub mod supervisor;
pub mod workflow;

pub use activity_monitor::ActivityMonitor;
pub use config::EngineConfig;
pub use error::EngineError;
pub use member_lock::MemberLocks;
pub use scheduler::Scheduler;
pub use supervisor::{BatchOutcome, Supervisor};
pub use workflow::{WorkflowConfig, WorkflowEngine, WorkflowStep};
