//! Flight records and the per-run schedule.

use pax_core::{FlightId, Minute};

// ── ShapeTag ─────────────────────────────────────────────────────────────────

/// Display shape assigned to a flight's passengers.
///
/// The engine never interprets this; it is carried so rendering collaborators
/// can tell flights apart without a lookup table of their own.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ShapeTag {
    #[default]
    Circle,
    Square,
    Triangle,
    Diamond,
}

// ── Flight ───────────────────────────────────────────────────────────────────

/// One departing flight.  Immutable for the run.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Flight {
    pub id: FlightId,
    /// Display number, e.g. "UA1142".
    pub number: String,
    /// Scheduled departure, minute-of-day.
    pub departure: Minute,
    /// Seats on the aircraft.
    pub seats: u32,
    /// Expected load factor, in [0, 1].
    pub fill_ratio: f64,
    pub shape: ShapeTag,
}

impl Flight {
    /// Total passengers this flight will generate: `round(seats × fill_ratio)`.
    #[inline]
    pub fn expected_passengers(&self) -> u32 {
        (self.seats as f64 * self.fill_ratio).round() as u32
    }

    /// Boarding-close minute-of-day (departure − 20 min), signed.
    #[inline]
    pub fn boarding_close(&self) -> i64 {
        self.departure.boarding_close()
    }
}

// ── FlightSchedule ───────────────────────────────────────────────────────────

/// The immutable per-run list of flights, indexed by `FlightId`.
///
/// `FlightId(i)` is the position in the underlying `Vec`, so hold rooms and
/// arrival tables can be parallel arrays.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlightSchedule {
    flights: Vec<Flight>,
}

impl FlightSchedule {
    /// Build a schedule, reassigning each flight's `id` to its position.
    pub fn new(mut flights: Vec<Flight>) -> Self {
        for (i, f) in flights.iter_mut().enumerate() {
            f.id = FlightId(i as u16);
        }
        Self { flights }
    }

    #[inline]
    pub fn get(&self, id: FlightId) -> Option<&Flight> {
        self.flights.get(id.index())
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Flight> {
        self.flights.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.flights.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.flights.is_empty()
    }

    pub fn flights(&self) -> &[Flight] {
        &self.flights
    }

    /// Earliest departure across the schedule, or `None` when empty.
    pub fn earliest_departure(&self) -> Option<Minute> {
        self.flights.iter().map(|f| f.departure).min()
    }

    /// Latest boarding-close across the schedule, or `None` when empty.
    pub fn latest_boarding_close(&self) -> Option<i64> {
        self.flights.iter().map(|f| f.boarding_close()).max()
    }
}

impl<'a> IntoIterator for &'a FlightSchedule {
    type Item = &'a Flight;
    type IntoIter = std::slice::Iter<'a, Flight>;
    fn into_iter(self) -> Self::IntoIter {
        self.flights.iter()
    }
}
