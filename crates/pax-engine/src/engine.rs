//! The `Engine` struct: six-phase stepper, time-travel navigation, and
//! read-only accessors.

use std::collections::{BTreeMap, VecDeque};

use pax_core::{FlightId, PassengerId, SimParams};
use pax_flight::{ArrivalGenerator, FlightSchedule, TicketCounterConfig};
use rustc_hash::FxHashSet;

use crate::{
    DelayQueue, EngineSnapshot, HistoryLog, PassengerStore, ServiceBank, SnapshotStore,
    StepObserver, store::Passenger,
};

/// The departure-flow simulation engine.
///
/// Construct via [`EngineBuilder`][crate::EngineBuilder].  All mutation goes
/// through the navigation API (`step`, `rewind`, `go_to_interval`,
/// `run_all`); everything else is a read-only view.  The engine holds no
/// locks and must be driven from a single logical caller.
pub struct Engine {
    params: SimParams,
    schedule: FlightSchedule,
    counters: Vec<TicketCounterConfig>,

    /// Minute-of-day of interval 0: earliest departure − arrival span.
    global_start: i64,
    /// Exclusive stepping bound: latest boarding-close offset + 1.
    total_intervals: u32,

    /// Per-flight minute-granularity arrival counts, indexed by `FlightId`.
    minute_arrivals: Vec<Vec<u32>>,
    /// Coarse-granularity generator, kept for the interval-table accessor.
    interval_generator: ArrivalGenerator,
    /// Per-flight offset of the arrival window start from `global_start`.
    arrival_offsets: Vec<i64>,
    /// Per-flight boarding-close offset from `global_start`.  Negative when
    /// boarding closes before the simulation window opens — such a flight
    /// never triggers close detection.
    close_offsets: Vec<i64>,
    /// Counters accepting each flight, ascending index, fallback to all
    /// counters pre-applied.  Acceptance is immutable, so this is fixed.
    allowed_counters: Vec<Vec<usize>>,

    store: PassengerStore,
    ticket: ServiceBank,
    checkpoint: ServiceBank,
    /// One FIFO per flight, append-only until reset.
    hold_rooms: Vec<VecDeque<PassengerId>>,

    pending_to_checkpoint: DelayQueue,
    pending_to_hold: DelayQueue,

    /// Passengers currently shown as "just completed ticketing" — inserted
    /// on ticket completion, cleared when they move on to a checkpoint.
    visible_ticketed: FxHashSet<PassengerId>,
    /// Flights whose boarding closed during the last simulated interval.
    just_closed: Vec<FlightId>,

    current_interval: u32,

    held_up: BTreeMap<u32, u32>,
    ticket_queued: BTreeMap<u32, u32>,
    checkpoint_queued: BTreeMap<u32, u32>,
    hold_room_total: BTreeMap<u32, u32>,

    history: HistoryLog,
    snapshots: SnapshotStore,
}

impl Engine {
    /// Called by the builder after validation.
    pub(crate) fn new(
        params: SimParams,
        schedule: FlightSchedule,
        counters: Vec<TicketCounterConfig>,
    ) -> Engine {
        let span = params.arrival_span_minutes as i64;
        let global_start = schedule
            .earliest_departure()
            .map(|m| m.as_i64() - span)
            .unwrap_or(0);
        let total_intervals = schedule
            .latest_boarding_close()
            .map(|close| (close - global_start + 1).max(0))
            .unwrap_or(0) as u32;

        let minute_generator = ArrivalGenerator::new(params.arrival_span_minutes, 1, params.seed);
        let interval_generator =
            ArrivalGenerator::new(params.arrival_span_minutes, params.interval_minutes, params.seed);
        let minute_arrivals = schedule.iter().map(|f| minute_generator.generate(f)).collect();

        let arrival_offsets = schedule
            .iter()
            .map(|f| f.departure.as_i64() - span - global_start)
            .collect();
        let close_offsets: Vec<i64> = schedule
            .iter()
            .map(|f| f.boarding_close() - global_start)
            .collect();
        let allowed_counters = schedule
            .iter()
            .map(|f| {
                let accepting: Vec<usize> = counters
                    .iter()
                    .enumerate()
                    .filter(|(_, c)| c.accepts(f))
                    .map(|(j, _)| j)
                    .collect();
                if accepting.is_empty() {
                    (0..counters.len()).collect()
                } else {
                    accepting
                }
            })
            .collect();

        let hold_rooms = vec![VecDeque::new(); schedule.len()];
        let ticket = ServiceBank::new(counters.len());
        let checkpoint = ServiceBank::new(params.checkpoint_count);

        let mut engine = Engine {
            params,
            schedule,
            counters,
            global_start,
            total_intervals,
            minute_arrivals,
            interval_generator,
            arrival_offsets,
            close_offsets,
            allowed_counters,
            store: PassengerStore::new(),
            ticket,
            checkpoint,
            hold_rooms,
            pending_to_checkpoint: DelayQueue::new(),
            pending_to_hold: DelayQueue::new(),
            visible_ticketed: FxHashSet::default(),
            just_closed: Vec::new(),
            current_interval: 0,
            held_up: BTreeMap::new(),
            ticket_queued: BTreeMap::new(),
            checkpoint_queued: BTreeMap::new(),
            hold_room_total: BTreeMap::new(),
            history: HistoryLog::new(),
            snapshots: SnapshotStore::new(),
        };
        engine.reset();
        engine
    }

    // ── Navigation API ────────────────────────────────────────────────────

    /// Advance one interval.
    ///
    /// If the next interval's snapshot already exists (we are below the
    /// frontier after a rewind or jump), this is a pure restore; otherwise a
    /// fresh minute is simulated and captured.  At or past the total bound,
    /// a no-op.
    pub fn step(&mut self) {
        if self.current_interval >= self.total_intervals {
            return;
        }
        if self.current_interval + 1 <= self.snapshots.max_computed() {
            self.restore(self.current_interval as i64 + 1);
            return;
        }
        self.simulate_interval();
    }

    /// Rewind by one interval, restoring the previous snapshot.  No-op at 0.
    pub fn rewind(&mut self) {
        if !self.can_rewind() {
            return;
        }
        self.restore(self.current_interval as i64 - 1);
    }

    /// Jump to `target`, clamped into `[0, max_computed_interval]`.
    pub fn go_to_interval(&mut self, target: u32) {
        self.restore(target as i64);
    }

    /// Reset to interval 0 and simulate every interval to the bound,
    /// invoking `observer` at each boundary.  Pre-populates history and
    /// snapshots for scrubbing without live animation.
    pub fn run_all<O: StepObserver>(&mut self, observer: &mut O) {
        self.reset();
        while self.current_interval < self.total_intervals {
            observer.on_interval_start(self.current_interval);
            self.simulate_interval();
            if !self.just_closed.is_empty() {
                observer.on_flights_closed(&self.just_closed);
            }
            observer.on_interval_end(self.current_interval);
        }
        observer.on_run_end(self.current_interval);
    }

    /// Clear all mutable state, re-capture the interval-0 snapshot, and
    /// discard history and prior snapshots.
    pub fn reset(&mut self) {
        self.current_interval = 0;
        self.store.clear();
        self.ticket.reset();
        self.checkpoint.reset();
        for room in &mut self.hold_rooms {
            room.clear();
        }
        self.pending_to_checkpoint.clear();
        self.pending_to_hold.clear();
        self.visible_ticketed.clear();
        self.just_closed.clear();
        self.history.clear();
        self.held_up.clear();
        self.ticket_queued.clear();
        self.checkpoint_queued.clear();
        self.hold_room_total.clear();

        self.record_queue_totals();
        let s0 = self.make_snapshot();
        self.snapshots.reset(s0);
    }

    /// True iff at least one earlier snapshot exists to restore.
    #[inline]
    pub fn can_rewind(&self) -> bool {
        self.current_interval > 0
    }

    /// True iff a future snapshot already exists — stepping forward needs no
    /// recomputation.
    #[inline]
    pub fn can_fast_forward(&self) -> bool {
        self.current_interval < self.snapshots.max_computed()
    }

    // ── Six-phase interval update ─────────────────────────────────────────

    fn simulate_interval(&mut self) {
        self.just_closed.clear();
        let minute = self.current_interval;

        // ── Phase 1: arrivals & boarding-close detection ──────────────────
        for fi in 0..self.schedule.len() {
            let flight_id = FlightId(fi as u16);

            let idx = minute as i64 - self.arrival_offsets[fi];
            if idx >= 0 && (idx as usize) < self.minute_arrivals[fi].len() {
                let total = self.minute_arrivals[fi][idx as usize];
                // Rounding bias favors in-person: online is the remainder,
                // not re-rounded.
                let in_person = (total as f64 * self.params.percent_in_person).round() as u32;
                let online = total - in_person;

                for _ in 0..in_person {
                    let id = self.store.spawn(flight_id, minute, true);
                    if let Some(lane) = self
                        .ticket
                        .shortest_lane(self.allowed_counters[fi].iter().copied())
                    {
                        self.ticket.enqueue(lane, id);
                    }
                }
                for _ in 0..online {
                    let id = self.store.spawn(flight_id, minute, false);
                    self.store.get_mut(id).checkpoint_entry = Some(minute);
                    if let Some(lane) =
                        self.checkpoint.shortest_lane(0..self.checkpoint.lane_count())
                    {
                        self.checkpoint.enqueue(lane, id);
                    }
                }
            }

            if minute as i64 == self.close_offsets[fi] {
                self.just_closed.push(flight_id);
                self.mark_flight_missed(flight_id);
            }
        }

        // ── Phase 2: ticket-counter service ───────────────────────────────
        for c in 0..self.counters.len() {
            let rate = self.counters[c].rate;
            let completions = self.ticket.accrue(c, rate);
            for _ in 0..completions {
                let Some(id) = self.ticket.take_next(c) else { break };
                self.store.get_mut(id).ticket_done = Some(minute);
                self.ticket.push_completed(c, id);
                self.visible_ticketed.insert(id);
                self.pending_to_checkpoint
                    .push(minute + self.params.transit_delay_minutes, id);
            }
        }

        // ── Phase 3: ticket → checkpoint transition ───────────────────────
        if let Some(ids) = self.pending_to_checkpoint.drain_minute(minute) {
            for id in ids {
                self.visible_ticketed.remove(&id);
                self.store.get_mut(id).checkpoint_entry = Some(minute);
                if let Some(lane) =
                    self.checkpoint.shortest_lane(0..self.checkpoint.lane_count())
                {
                    self.checkpoint.enqueue(lane, id);
                }
            }
        }

        // ── Phase 4: checkpoint service ───────────────────────────────────
        for c in 0..self.checkpoint.lane_count() {
            let completions = self.checkpoint.accrue(c, self.params.checkpoint_rate);
            for _ in 0..completions {
                let Some(id) = self.checkpoint.take_next(c) else { break };
                self.store.get_mut(id).checkpoint_done = Some(minute);
                self.checkpoint.push_completed(c, id);
                self.pending_to_hold
                    .push(minute + self.params.hold_delay_minutes, id);
            }
        }

        // ── Phase 5: checkpoint → hold-room transition ────────────────────
        if let Some(ids) = self.pending_to_hold.drain_minute(minute) {
            for id in ids {
                let flight = self.store.get(id).flight;
                if minute as i64 <= self.close_offsets[flight.index()] {
                    let room = &mut self.hold_rooms[flight.index()];
                    let seq = room.len() as u32 + 1;
                    room.push_back(id);
                    let p = self.store.get_mut(id);
                    p.hold_room_entry = Some(minute);
                    p.hold_room_sequence = Some(seq);
                } else {
                    // Boarding closed while in transit: never reaches the
                    // hold room; the purge below removes it.
                    self.store.get_mut(id).missed = true;
                }
            }
        }

        // ── Phase 6: history, purge, clock, metrics, snapshot ─────────────
        self.history
            .append_interval(&self.ticket, &self.checkpoint, &self.hold_rooms);

        let store = &self.store;
        self.ticket.retain_all(|id| !store.get(id).missed);
        self.checkpoint.retain_all(|id| !store.get(id).missed);

        self.current_interval += 1;
        let held = (self.ticket.waiting_total() + self.checkpoint.waiting_total()) as u32;
        self.held_up.insert(self.current_interval, held);
        self.record_queue_totals();

        let snap = self.make_snapshot();
        self.snapshots.put(self.current_interval, snap);
    }

    /// Mark every passenger of `flight` in the four active queue families
    /// missed.  Hold rooms are left alone: queue membership, not pipeline
    /// progress, decides who is marked.
    fn mark_flight_missed(&mut self, flight: FlightId) {
        let mut to_mark: Vec<PassengerId> = Vec::new();
        for bank in [&self.ticket, &self.checkpoint] {
            for q in bank.waiting().iter().chain(bank.completed().iter()) {
                to_mark.extend(
                    q.iter()
                        .copied()
                        .filter(|&id| self.store.get(id).flight == flight),
                );
            }
        }
        for id in to_mark {
            self.store.get_mut(id).missed = true;
        }
    }

    fn record_queue_totals(&mut self) {
        let i = self.current_interval;
        self.ticket_queued.insert(i, self.ticket.waiting_total() as u32);
        self.checkpoint_queued
            .insert(i, self.checkpoint.waiting_total() as u32);
        let hold: usize = self.hold_rooms.iter().map(VecDeque::len).sum();
        self.hold_room_total.insert(i, hold as u32);
    }

    // ── Snapshot capture/restore ──────────────────────────────────────────

    fn make_snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            interval: self.current_interval,
            ticket: self.ticket.to_snapshot(),
            checkpoint: self.checkpoint.to_snapshot(),
            hold_rooms: self
                .hold_rooms
                .iter()
                .map(|q| q.iter().copied().collect())
                .collect(),
            pending_to_checkpoint: self.pending_to_checkpoint.to_snapshot(),
            pending_to_hold: self.pending_to_hold.to_snapshot(),
            visible_ticketed: self.visible_ticketed.clone(),
            just_closed: self.just_closed.clone(),
            held_up: self.held_up.clone(),
            ticket_queued: self.ticket_queued.clone(),
            checkpoint_queued: self.checkpoint_queued.clone(),
            hold_room_total: self.hold_room_total.clone(),
        }
    }

    /// Restore all live mutable state from the snapshot at `target`
    /// (clamped).  Queue containers are refilled in place.
    fn restore(&mut self, target: i64) {
        let t = self.snapshots.clamp(target);
        let Some(snap) = self.snapshots.get(t) else {
            return;
        };
        let snap = snap.clone();

        self.current_interval = snap.interval;
        self.ticket.restore_from(&snap.ticket);
        self.checkpoint.restore_from(&snap.checkpoint);

        if self.hold_rooms.len() != snap.hold_rooms.len() {
            self.hold_rooms = vec![VecDeque::new(); snap.hold_rooms.len()];
        }
        for (live, saved) in self.hold_rooms.iter_mut().zip(&snap.hold_rooms) {
            live.clear();
            live.extend(saved.iter().copied());
        }

        self.pending_to_checkpoint.restore_from(&snap.pending_to_checkpoint);
        self.pending_to_hold.restore_from(&snap.pending_to_hold);

        self.visible_ticketed = snap.visible_ticketed;
        self.just_closed = snap.just_closed;

        self.held_up = snap.held_up;
        self.ticket_queued = snap.ticket_queued;
        self.checkpoint_queued = snap.checkpoint_queued;
        self.hold_room_total = snap.hold_room_total;
    }

    // ── Interval accessors ────────────────────────────────────────────────

    #[inline]
    pub fn current_interval(&self) -> u32 {
        self.current_interval
    }

    /// The largest interval index a snapshot exists for.
    #[inline]
    pub fn max_computed_interval(&self) -> u32 {
        self.snapshots.max_computed()
    }

    /// Exclusive stepping bound, derived from the latest boarding-close.
    #[inline]
    pub fn total_intervals(&self) -> u32 {
        self.total_intervals
    }

    /// Minute-of-day corresponding to interval 0 (signed: a pre-dawn run
    /// can anchor before midnight).
    #[inline]
    pub fn global_start(&self) -> i64 {
        self.global_start
    }

    // ── Queue views ───────────────────────────────────────────────────────

    pub fn ticket_lines(&self) -> &[VecDeque<PassengerId>] {
        self.ticket.waiting()
    }

    pub fn completed_ticket_lines(&self) -> &[VecDeque<PassengerId>] {
        self.ticket.completed()
    }

    pub fn checkpoint_lines(&self) -> &[VecDeque<PassengerId>] {
        self.checkpoint.waiting()
    }

    pub fn completed_checkpoint_lines(&self) -> &[VecDeque<PassengerId>] {
        self.checkpoint.completed()
    }

    pub fn hold_rooms(&self) -> &[VecDeque<PassengerId>] {
        &self.hold_rooms
    }

    /// Passengers in counter `idx`'s completed line that are still in their
    /// "just ticketed" reveal window (not yet departed for a checkpoint).
    pub fn visible_completed_ticket_line(&self, idx: usize) -> Vec<PassengerId> {
        self.ticket.completed()[idx]
            .iter()
            .copied()
            .filter(|id| self.visible_ticketed.contains(id))
            .collect()
    }

    /// All checkpoint-queue passengers, flattened across lanes.
    pub fn checkpoint_line(&self) -> Vec<PassengerId> {
        self.checkpoint
            .waiting()
            .iter()
            .flat_map(|q| q.iter().copied())
            .collect()
    }

    /// Flights whose boarding closed during the last simulated interval.
    pub fn just_closed(&self) -> &[FlightId] {
        &self.just_closed
    }

    // ── Passenger / configuration views ───────────────────────────────────

    #[inline]
    pub fn passenger(&self, id: PassengerId) -> &Passenger {
        self.store.get(id)
    }

    pub fn passengers(&self) -> &PassengerStore {
        &self.store
    }

    pub fn flights(&self) -> &FlightSchedule {
        &self.schedule
    }

    pub fn counters(&self) -> &[TicketCounterConfig] {
        &self.counters
    }

    pub fn params(&self) -> &SimParams {
        &self.params
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    // ── Metric series ─────────────────────────────────────────────────────

    /// Legacy combined series: ticket-queue total + checkpoint-queue total.
    pub fn held_up_series(&self) -> &BTreeMap<u32, u32> {
        &self.held_up
    }

    pub fn ticket_queued_series(&self) -> &BTreeMap<u32, u32> {
        &self.ticket_queued
    }

    pub fn checkpoint_queued_series(&self) -> &BTreeMap<u32, u32> {
        &self.checkpoint_queued
    }

    pub fn hold_room_series(&self) -> &BTreeMap<u32, u32> {
        &self.hold_room_total
    }

    pub fn held_up_at(&self, interval: u32) -> u32 {
        self.held_up.get(&interval).copied().unwrap_or(0)
    }

    pub fn ticket_queued_at(&self, interval: u32) -> u32 {
        self.ticket_queued.get(&interval).copied().unwrap_or(0)
    }

    pub fn checkpoint_queued_at(&self, interval: u32) -> u32 {
        self.checkpoint_queued.get(&interval).copied().unwrap_or(0)
    }

    pub fn hold_room_total_at(&self, interval: u32) -> u32 {
        self.hold_room_total.get(&interval).copied().unwrap_or(0)
    }

    // ── Arrival lookups ───────────────────────────────────────────────────

    /// The per-minute arrival counts for one flight (indexed from its own
    /// arrival-window start).
    pub fn minute_arrival_counts(&self, flight: FlightId) -> Option<&[u32]> {
        self.minute_arrivals.get(flight.index()).map(Vec::as_slice)
    }

    /// Arrival counts for one flight at the configured coarse interval
    /// granularity, regenerated on demand (the generator is restartable).
    pub fn interval_arrival_counts(&self, flight: FlightId) -> Option<Vec<u32>> {
        let f = self.schedule.get(flight)?;
        Some(self.interval_generator.generate(f))
    }

    /// Total arrivals across all flights at `minute` (since global start).
    pub fn total_arrivals_at_minute(&self, minute: u32) -> u32 {
        let mut sum = 0;
        for fi in 0..self.schedule.len() {
            let idx = minute as i64 - self.arrival_offsets[fi];
            if idx >= 0 && (idx as usize) < self.minute_arrivals[fi].len() {
                sum += self.minute_arrivals[fi][idx as usize];
            }
        }
        sum
    }

    /// Arrivals aligned to the timeline: interval 0 is the pre-simulation
    /// state (no arrivals); interval `i ≥ 1` covers minute `i − 1`.
    pub fn total_arrivals_at_interval(&self, interval: u32) -> u32 {
        if interval == 0 {
            0
        } else {
            self.total_arrivals_at_minute(interval - 1)
        }
    }
}
