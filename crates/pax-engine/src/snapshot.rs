//! Snapshot capture/restore — the time-travel mechanism.
//!
//! One snapshot per interval index, where snapshot index == the engine's
//! interval counter at capture time.  Index 0 is the initial state before
//! any minute has been simulated.  Snapshots are immutable once stored and
//! are invalidated only by a full reset.
//!
//! Because queues hold `PassengerId` handles, a snapshot is a set of cheap
//! index-sequence copies: it freezes queue membership and ordering, not
//! passenger payloads.

use std::collections::BTreeMap;

use pax_core::{FlightId, PassengerId};
use rustc_hash::FxHashSet;

use crate::LaneSnapshot;

// ── EngineSnapshot ───────────────────────────────────────────────────────────

/// A full, independent, restorable copy of all mutable engine state.
#[derive(Clone, Debug)]
pub struct EngineSnapshot {
    pub interval: u32,

    pub ticket: LaneSnapshot,
    pub checkpoint: LaneSnapshot,
    pub hold_rooms: Vec<Vec<PassengerId>>,

    pub pending_to_checkpoint: BTreeMap<u32, Vec<PassengerId>>,
    pub pending_to_hold: BTreeMap<u32, Vec<PassengerId>>,

    /// Passengers currently shown as "just completed ticketing".
    pub visible_ticketed: FxHashSet<PassengerId>,
    /// Flights whose boarding closed in the producing interval.
    pub just_closed: Vec<FlightId>,

    pub held_up: BTreeMap<u32, u32>,
    pub ticket_queued: BTreeMap<u32, u32>,
    pub checkpoint_queued: BTreeMap<u32, u32>,
    pub hold_room_total: BTreeMap<u32, u32>,
}

// ── SnapshotStore ────────────────────────────────────────────────────────────

/// Snapshots indexed by interval number.
///
/// Invariant: the highest populated index always equals the engine's maximum
/// computed interval, and that maximum is monotonically non-decreasing until
/// a reset.
#[derive(Clone, Debug, Default)]
pub struct SnapshotStore {
    snapshots: Vec<EngineSnapshot>,
    max_computed: u32,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard everything and install `initial` as the interval-0 snapshot.
    pub fn reset(&mut self, initial: EngineSnapshot) {
        self.snapshots.clear();
        self.snapshots.push(initial);
        self.max_computed = 0;
    }

    /// Store `snap` at `interval`, overwriting any prior snapshot there
    /// (re-simulation after a rewind replaces the old future).
    pub fn put(&mut self, interval: u32, snap: EngineSnapshot) {
        let i = interval as usize;
        if i < self.snapshots.len() {
            self.snapshots[i] = snap;
        } else {
            debug_assert_eq!(i, self.snapshots.len(), "snapshot indices must be dense");
            self.snapshots.push(snap);
        }
        self.max_computed = self.max_computed.max(interval);
    }

    pub fn get(&self, interval: u32) -> Option<&EngineSnapshot> {
        self.snapshots.get(interval as usize)
    }

    /// The largest interval index with a stored snapshot.
    #[inline]
    pub fn max_computed(&self) -> u32 {
        self.max_computed
    }

    /// Clamp a navigation target into the valid snapshot range.
    #[inline]
    pub fn clamp(&self, target: i64) -> u32 {
        target.clamp(0, self.max_computed as i64) as u32
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
