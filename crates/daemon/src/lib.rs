// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! amx-daemon: the process host for the Orchestration API (C9) and its
//! background loops — the Scheduler's boot-time re-arm and the Activity
//! Monitor ticker. No IPC transport is specified by this system, so this
//! crate owns an in-process `OrchestrationApi` rather than fronting it with
//! a socket listener (spec §6, §9).

pub mod env;
pub mod startup;

pub use startup::{Daemon, StartupError};
