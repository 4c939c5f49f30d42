// SPDX-License-Identifier: MIT

//! Per-member mutual exclusion shared by the Supervisor, Activity Monitor,
//! and API lifecycle mutations (spec §5: "registration, activity polling,
//! and lifecycle mutations are mutually exclusive under a per-member
//! mutex").

use amx_core::MemberId;
use parking_lot::Mutex as SyncMutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Default)]
pub struct MemberLocks {
    locks: SyncMutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl MemberLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_for(&self, member_id: &MemberId) -> Arc<Mutex<()>> {
        self.locks
            .lock()
            .entry(member_id.as_str().to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Acquire exclusive access to `member_id`. Held until the returned
    /// guard is dropped.
    pub async fn acquire(&self, member_id: &MemberId) -> OwnedMutexGuard<()> {
        self.lock_for(member_id).lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn same_member_serializes_concurrent_acquires() {
        let locks = Arc::new(MemberLocks::new());
        let member = MemberId::new("m1");

        let first = locks.acquire(&member).await;
        let locks2 = locks.clone();
        let member2 = member.clone();
        let handle = tokio::spawn(async move {
            let _second = locks2.acquire(&member2).await;
        });

        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert!(!handle.is_finished());
        drop(first);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn different_members_do_not_contend() {
        let locks = MemberLocks::new();
        let a = locks.acquire(&MemberId::new("a")).await;
        let b = locks.acquire(&MemberId::new("b")).await;
        drop(a);
        drop(b);
    }
}
