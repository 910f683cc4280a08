#![forbid(unsafe_code)]

//! Per-kind event counters.
//!
//! Counts how many times each [`EventKind`] has been observed. Ordinals are
//! zero-based: [`EventCounters::bump`] returns the count *before* the
//! increment, so the first observed `keydown` is logged as `keydown[0]`.

use ahash::AHashMap;
use evtap_core::EventKind;

/// Running observation counts, one per event kind.
#[derive(Debug, Clone, Default)]
pub struct EventCounters {
    counts: AHashMap<EventKind, u64>,
}

impl EventCounters {
    /// Create empty counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment the count for `kind` and return the pre-increment ordinal.
    pub fn bump(&mut self, kind: EventKind) -> u64 {
        let slot = self.counts.entry(kind).or_insert(0);
        let ordinal = *slot;
        *slot += 1;
        ordinal
    }

    /// Current count for `kind`.
    #[must_use]
    pub fn get(&self, kind: EventKind) -> u64 {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    /// Total events observed across all kinds.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Non-zero counts in the canonical kind order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<(EventKind, u64)> {
        EventKind::ALL
            .into_iter()
            .filter_map(|kind| {
                let count = self.get(kind);
                (count > 0).then_some((kind, count))
            })
            .collect()
    }

    /// Reset every count to zero.
    pub fn reset(&mut self) {
        self.counts.clear();
    }
}
