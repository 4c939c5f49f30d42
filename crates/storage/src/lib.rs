// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! amx-storage: the snapshot store (C2) — atomic read/write of every entity
//! collection under the home directory (spec §3, §4.2). Deliberately no WAL
//! or checkpoint log: each write is a whole-file atomic replace.

pub mod error;
pub mod paths;
pub mod runtime_registry;
pub mod snapshot;
pub mod store;

pub use error::StorageError;
pub use paths::StoragePaths;
pub use runtime_registry::RuntimeRegistry;
pub use store::Storage;
