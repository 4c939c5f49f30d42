// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! amx-adapters: the Session Driver (C1) — the only component in this
//! workspace that shells out to an external terminal multiplexer.

pub mod session;

pub use session::{SessionAdapter, SessionError, SessionInfo};
