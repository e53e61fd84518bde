//! Passenger records and the index-stable arena that owns them.
//!
//! # Why an arena?
//!
//! A passenger is referenced from many places at once: a live queue, the
//! completed line it already passed through, the history log, and every
//! snapshot captured since it arrived.  Cloning the record into each holder
//! would break the "snapshot freezes queue membership, not passenger
//! identity" semantic.  Instead the engine owns all passengers in one
//! `Vec`, and everything else holds `PassengerId` handles — the id is the
//! index, so lookups are O(1) and ids stay valid for the life of the run.
//!
//! Spawn order is deterministic, so ids themselves are reproducible across
//! identically seeded runs.

use pax_core::{FlightId, PassengerId};

// ── Passenger ────────────────────────────────────────────────────────────────

/// One traveler's progress through the pipeline.
///
/// Stage stamps are set at most once and are monotonically non-decreasing in
/// pipeline order.  `missed` is terminal: the purge phase removes the
/// passenger from all active queues at the end of the minute.
#[derive(Clone, Debug)]
pub struct Passenger {
    pub flight: FlightId,
    /// Interval at which the passenger entered the system.
    pub arrival_interval: u32,
    /// In-person purchase → must pass a ticket counter first.
    pub in_person: bool,

    pub ticket_done: Option<u32>,
    pub checkpoint_entry: Option<u32>,
    pub checkpoint_done: Option<u32>,
    pub hold_room_entry: Option<u32>,
    /// 1-based arrival order within the flight's hold room.
    pub hold_room_sequence: Option<u32>,

    pub missed: bool,
}

impl Passenger {
    fn new(flight: FlightId, arrival_interval: u32, in_person: bool) -> Self {
        Self {
            flight,
            arrival_interval,
            in_person,
            ticket_done: None,
            checkpoint_entry: None,
            checkpoint_done: None,
            hold_room_entry: None,
            hold_room_sequence: None,
            missed: false,
        }
    }

    /// True once the passenger has been admitted to a hold room.
    #[inline]
    pub fn in_hold_room(&self) -> bool {
        self.hold_room_entry.is_some()
    }
}

// ── PassengerStore ───────────────────────────────────────────────────────────

/// Index-stable arena: `PassengerId(i)` is position `i` in the backing `Vec`.
#[derive(Clone, Debug, Default)]
pub struct PassengerStore {
    passengers: Vec<Passenger>,
}

impl PassengerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a passenger and return its handle.
    pub fn spawn(&mut self, flight: FlightId, arrival_interval: u32, in_person: bool) -> PassengerId {
        let id = PassengerId(self.passengers.len() as u32);
        self.passengers.push(Passenger::new(flight, arrival_interval, in_person));
        id
    }

    #[inline]
    pub fn get(&self, id: PassengerId) -> &Passenger {
        &self.passengers[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: PassengerId) -> &mut Passenger {
        &mut self.passengers[id.index()]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.passengers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.passengers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PassengerId, &Passenger)> {
        self.passengers
            .iter()
            .enumerate()
            .map(|(i, p)| (PassengerId(i as u32), p))
    }

    /// Drop all passengers.  Only valid together with a full engine reset —
    /// outstanding handles in snapshots or history become dangling otherwise.
    pub fn clear(&mut self) {
        self.passengers.clear();
    }
}
