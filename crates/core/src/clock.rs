// SPDX-License-Identifier: MIT

//! Clock abstraction so time-dependent logic (check-in scheduling, activity
//! polling, supervisor deadlines) can be driven deterministically in tests.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of truth for "now" across the core. Production code uses
/// [`SystemClock`]; tests use [`FakeClock`] to advance time explicitly.
pub trait Clock: Clone + Send + Sync + 'static {
    /// Current wall-clock time.
    fn now(&self) -> DateTime<Utc>;

    /// Current wall-clock time as milliseconds since the Unix epoch.
    fn epoch_ms(&self) -> u64 {
        self.now().timestamp_millis().max(0) as u64
    }
}

/// Real wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn epoch_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

/// Deterministic clock for tests. Starts at the Unix epoch unless
/// constructed with [`FakeClock::at`], and only moves when told to.
#[derive(Debug, Clone)]
pub struct FakeClock {
    epoch_ms: Arc<AtomicI64>,
    // Guards compound read-modify-write advances (`advance`) against races
    // between concurrent tasks sharing one FakeClock.
    advance_lock: Arc<Mutex<()>>,
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::at(0)
    }
}

impl FakeClock {
    pub fn at(epoch_ms: i64) -> Self {
        Self {
            epoch_ms: Arc::new(AtomicI64::new(epoch_ms)),
            advance_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Move the clock forward by `millis` and return the new epoch_ms.
    pub fn advance(&self, millis: i64) -> i64 {
        let _guard = self.advance_lock.lock();
        self.epoch_ms.fetch_add(millis, Ordering::SeqCst) + millis
    }

    /// Pin the clock to an exact epoch_ms value.
    pub fn set(&self, epoch_ms: i64) {
        self.epoch_ms.store(epoch_ms, Ordering::SeqCst);
    }
}

impl Clock for FakeClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.epoch_ms.load(Ordering::SeqCst)).unwrap_or(Utc::now())
    }

    fn epoch_ms(&self) -> u64 {
        self.epoch_ms.load(Ordering::SeqCst).max(0) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fake_clock_advances_monotonically() {
        let clock = FakeClock::at(1_000);
        assert_eq!(clock.epoch_ms(), 1_000);
        clock.advance(500);
        assert_eq!(clock.epoch_ms(), 1_500);
    }

    #[test]
    fn fake_clock_set_pins_exact_value() {
        let clock = FakeClock::default();
        clock.set(42_000);
        assert_eq!(clock.epoch_ms(), 42_000);
    }

    #[test]
    fn system_clock_is_increasing() {
        let clock = SystemClock;
        let a = clock.epoch_ms();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = clock.epoch_ms();
        assert!(b >= a);
    }
}
