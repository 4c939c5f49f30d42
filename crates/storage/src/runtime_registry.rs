// SPDX-License-Identifier: MIT

//! `runtime.json`: the latest self-registration ping per role, the
//! registration oracle the Agent Supervisor consults (spec §4.6, §6).

use crate::error::StorageError;
use crate::snapshot::{read_or_default, write_atomic};
use amx_core::role::Role;
use amx_core::RuntimePing;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Default, serde::Serialize, serde::Deserialize)]
struct RuntimeDoc {
    pings: HashMap<Role, RuntimePing>,
}

pub struct RuntimeRegistry {
    path: PathBuf,
    pings: RwLock<HashMap<Role, RuntimePing>>,
}

impl RuntimeRegistry {
    pub fn load(path: PathBuf) -> Result<Self, StorageError> {
        let doc: RuntimeDoc = read_or_default(&path)?;
        Ok(Self {
            path,
            pings: RwLock::new(doc.pings),
        })
    }

    fn flush(&self) -> Result<(), StorageError> {
        let doc = RuntimeDoc {
            pings: self.pings.read().clone(),
        };
        write_atomic(&self.path, &doc)
    }

    /// Record a registration ping, overwriting any prior ping for the role.
    pub fn record(&self, ping: RuntimePing) -> Result<(), StorageError> {
        self.pings.write().insert(ping.role, ping);
        self.flush()
    }

    pub fn latest(&self, role: Role) -> Option<RuntimePing> {
        self.pings.read().get(&role).cloned()
    }
}
