#![forbid(unsafe_code)]

//! Millisecond clock seam.
//!
//! The inspector reports a `(+delta)` between consecutive log lines, so it
//! needs a source of wall-clock milliseconds it can also fake in tests.
//! [`SystemClock`] reads real time (via `web-time`, so wasm targets work);
//! [`ManualClock`] is advanced by hand.

use std::cell::Cell;

use web_time::{SystemTime, UNIX_EPOCH};

/// Source of epoch milliseconds.
pub trait Clock {
    /// Milliseconds since the Unix epoch.
    fn now_ms(&self) -> u64;
}

/// Real wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        // A clock before the epoch degrades to 0 rather than failing.
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or(0)
    }
}

/// Hand-advanced clock for deterministic tests.
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: Cell<u64>,
}

impl ManualClock {
    /// Create a clock starting at the given epoch milliseconds.
    #[must_use]
    pub fn new(start_ms: u64) -> Self {
        Self {
            now_ms: Cell::new(start_ms),
        }
    }

    /// Move time forward.
    pub fn advance(&self, ms: u64) {
        self.now_ms.set(self.now_ms.get().saturating_add(ms));
    }

    /// Jump to an absolute time.
    pub fn set(&self, ms: u64) {
        self.now_ms.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now_ms.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_advances() {
        let clock = ManualClock::new(100);
        assert_eq!(clock.now_ms(), 100);
        clock.advance(25);
        assert_eq!(clock.now_ms(), 125);
        clock.set(1_000);
        assert_eq!(clock.now_ms(), 1_000);
    }

    #[test]
    fn system_clock_is_past_2020() {
        // 2020-01-01 in epoch ms.
        assert!(SystemClock.now_ms() > 1_577_836_800_000);
    }

    #[test]
    fn clock_works_through_references() {
        let clock = ManualClock::new(7);
        let by_ref: &dyn Clock = &clock;
        assert_eq!(by_ref.now_ms(), 7);
    }
}
