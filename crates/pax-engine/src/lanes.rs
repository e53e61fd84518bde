//! `ServiceBank` — the queue network for one server class.
//!
//! Ticket counters and security checkpoints share identical mechanics: each
//! lane has a FIFO waiting queue, a FIFO completed queue (retained for
//! history and inspection — entries are never drained, only purged when a
//! passenger misses its flight), a fractional progress accumulator, and an
//! at-most-one "currently serving" slot.
//!
//! Rates are passengers-per-minute and may be fractional: `accrue` adds the
//! rate, completes `floor(progress)` passengers, and carries the remainder
//! to the next minute, so a 0.5-rate lane completes one passenger every two
//! minutes.

use std::collections::VecDeque;

use pax_core::PassengerId;

// ── LaneSnapshot ─────────────────────────────────────────────────────────────

/// Deep copy of a `ServiceBank`'s mutable state: id sequences per queue,
/// progress accumulators, serving slots.  Passengers are referenced by
/// handle, never duplicated.
#[derive(Clone, Debug, Default)]
pub struct LaneSnapshot {
    pub waiting: Vec<Vec<PassengerId>>,
    pub completed: Vec<Vec<PassengerId>>,
    pub progress: Vec<f64>,
    pub serving: Vec<Option<PassengerId>>,
}

// ── ServiceBank ──────────────────────────────────────────────────────────────

/// Waiting/completed queue pairs plus service state, indexed 0..lane_count.
#[derive(Clone, Debug, Default)]
pub struct ServiceBank {
    waiting: Vec<VecDeque<PassengerId>>,
    completed: Vec<VecDeque<PassengerId>>,
    progress: Vec<f64>,
    serving: Vec<Option<PassengerId>>,
}

impl ServiceBank {
    pub fn new(lane_count: usize) -> Self {
        Self {
            waiting: vec![VecDeque::new(); lane_count],
            completed: vec![VecDeque::new(); lane_count],
            progress: vec![0.0; lane_count],
            serving: vec![None; lane_count],
        }
    }

    #[inline]
    pub fn lane_count(&self) -> usize {
        self.waiting.len()
    }

    pub fn waiting(&self) -> &[VecDeque<PassengerId>] {
        &self.waiting
    }

    pub fn completed(&self) -> &[VecDeque<PassengerId>] {
        &self.completed
    }

    pub fn enqueue(&mut self, lane: usize, id: PassengerId) {
        self.waiting[lane].push_back(id);
    }

    pub fn push_completed(&mut self, lane: usize, id: PassengerId) {
        self.completed[lane].push_back(id);
    }

    /// The allowed lane with the fewest waiting passengers.
    ///
    /// Ties break toward the lane yielded first; callers pass lanes in
    /// ascending index order, giving the lowest-index tie-break.
    pub fn shortest_lane<I>(&self, allowed: I) -> Option<usize>
    where
        I: IntoIterator<Item = usize>,
    {
        let mut best: Option<usize> = None;
        for lane in allowed {
            match best {
                Some(b) if self.waiting[lane].len() >= self.waiting[b].len() => {}
                _ => best = Some(lane),
            }
        }
        best
    }

    /// Add one minute's worth of service; returns completions owed this
    /// minute (integer part, fractional remainder carries over).
    pub fn accrue(&mut self, lane: usize, rate: f64) -> u32 {
        self.progress[lane] += rate;
        let done = self.progress[lane].floor();
        self.progress[lane] -= done;
        done as u32
    }

    /// Serving-slot mechanics: if the slot is empty, pull the queue head
    /// into it; then take whatever is in the slot.  `None` means the lane
    /// has nobody to serve — callers stop spending completions on it.
    pub fn take_next(&mut self, lane: usize) -> Option<PassengerId> {
        if self.serving[lane].is_none() {
            self.serving[lane] = self.waiting[lane].pop_front();
        }
        self.serving[lane].take()
    }

    pub fn waiting_total(&self) -> usize {
        self.waiting.iter().map(VecDeque::len).sum()
    }

    pub fn completed_total(&self) -> usize {
        self.completed.iter().map(VecDeque::len).sum()
    }

    /// Drop entries failing `keep` from every waiting and completed queue.
    pub fn retain_all(&mut self, mut keep: impl FnMut(PassengerId) -> bool) {
        for q in &mut self.waiting {
            q.retain(|&id| keep(id));
        }
        for q in &mut self.completed {
            q.retain(|&id| keep(id));
        }
    }

    /// Empty every queue and zero all service state.  Lane count unchanged.
    pub fn reset(&mut self) {
        for q in &mut self.waiting {
            q.clear();
        }
        for q in &mut self.completed {
            q.clear();
        }
        self.progress.fill(0.0);
        self.serving.fill(None);
    }

    // ── Snapshot support ──────────────────────────────────────────────────

    pub fn to_snapshot(&self) -> LaneSnapshot {
        LaneSnapshot {
            waiting: self.waiting.iter().map(|q| q.iter().copied().collect()).collect(),
            completed: self.completed.iter().map(|q| q.iter().copied().collect()).collect(),
            progress: self.progress.clone(),
            serving: self.serving.clone(),
        }
    }

    /// Overwrite live state from a snapshot, in place: queue containers are
    /// cleared and refilled rather than replaced, so external holders of a
    /// queue view observe the update.  Shapes are rebuilt only if the lane
    /// count changed.
    pub fn restore_from(&mut self, snap: &LaneSnapshot) {
        if self.waiting.len() != snap.waiting.len() {
            self.waiting = vec![VecDeque::new(); snap.waiting.len()];
            self.completed = vec![VecDeque::new(); snap.completed.len()];
        }
        for (live, saved) in self.waiting.iter_mut().zip(&snap.waiting) {
            live.clear();
            live.extend(saved.iter().copied());
        }
        for (live, saved) in self.completed.iter_mut().zip(&snap.completed) {
            live.clear();
            live.extend(saved.iter().copied());
        }

        if self.progress.len() == snap.progress.len() {
            self.progress.copy_from_slice(&snap.progress);
        } else {
            self.progress = snap.progress.clone();
        }
        if self.serving.len() == snap.serving.len() {
            self.serving.copy_from_slice(&snap.serving);
        } else {
            self.serving = snap.serving.clone();
        }
    }
}
