//! `DelayQueue` — sparse minute-keyed pending map.
//!
//! Holds passengers between "service completed" and "arrives at the next
//! stage".  A completion at minute `m` with transit delay `d` registers the
//! passenger under key `m + d`; the stepper drains exactly the current
//! minute's entry each interval — O(active transitions) work instead of
//! scanning every in-flight passenger.
//!
//! `BTreeMap` keeps keys ordered, which makes snapshots of the pending state
//! compare deterministically across identically seeded runs.

use std::collections::BTreeMap;

use pax_core::PassengerId;

/// Mapping from target minute → passengers that transition at that minute.
#[derive(Clone, Debug, Default)]
pub struct DelayQueue {
    inner: BTreeMap<u32, Vec<PassengerId>>,
}

impl DelayQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `id` to transition at `minute`.
    pub fn push(&mut self, minute: u32, id: PassengerId) {
        self.inner.entry(minute).or_default().push(id);
    }

    /// Remove and return all passengers scheduled for exactly `minute`.
    ///
    /// `None` when nothing is due — the common case, avoiding allocation.
    pub fn drain_minute(&mut self, minute: u32) -> Option<Vec<PassengerId>> {
        self.inner.remove(&minute)
    }

    /// Total pending passengers across all future minutes.
    pub fn len(&self) -> usize {
        self.inner.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    // ── Snapshot support ──────────────────────────────────────────────────

    pub fn to_snapshot(&self) -> BTreeMap<u32, Vec<PassengerId>> {
        self.inner.clone()
    }

    /// Overwrite pending state in place (container identity preserved).
    pub fn restore_from(&mut self, snap: &BTreeMap<u32, Vec<PassengerId>>) {
        self.inner.clear();
        self.inner.extend(snap.iter().map(|(&k, v)| (k, v.clone())));
    }
}
