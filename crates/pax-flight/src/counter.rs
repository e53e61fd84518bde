//! Ticket-counter configuration.

use rustc_hash::FxHashSet;

use pax_core::{CounterId, FlightId};

use crate::Flight;

// ── CounterAcceptance ────────────────────────────────────────────────────────

/// Which flights a counter will serve.
///
/// A tagged variant instead of a trait object: the predicate is evaluated
/// uniformly in the arrival phase, and `Only` carries an explicit allow-set.
#[derive(Clone, Debug, Default)]
pub enum CounterAcceptance {
    /// Serves every flight.
    #[default]
    All,
    /// Serves only the listed flights.
    Only(FxHashSet<FlightId>),
}

impl CounterAcceptance {
    /// Convenience constructor for an explicit allow-set.
    pub fn only(flights: impl IntoIterator<Item = FlightId>) -> Self {
        CounterAcceptance::Only(flights.into_iter().collect())
    }

    #[inline]
    pub fn accepts(&self, flight: &Flight) -> bool {
        match self {
            CounterAcceptance::All => true,
            CounterAcceptance::Only(set) => set.contains(&flight.id),
        }
    }

    /// The allow-set, if any — used for build-time validation of flight ids.
    pub fn allow_set(&self) -> Option<&FxHashSet<FlightId>> {
        match self {
            CounterAcceptance::All => None,
            CounterAcceptance::Only(set) => Some(set),
        }
    }
}

// ── TicketCounterConfig ──────────────────────────────────────────────────────

/// One ticket counter: a service rate and an acceptance predicate.
/// Immutable for the run.
#[derive(Clone, Debug)]
pub struct TicketCounterConfig {
    pub id: CounterId,
    /// Passengers served per minute.  Fractional rates accumulate across
    /// minutes (0.5 completes one passenger every two minutes).
    pub rate: f64,
    pub acceptance: CounterAcceptance,
}

impl TicketCounterConfig {
    pub fn new(id: CounterId, rate: f64) -> Self {
        Self {
            id,
            rate,
            acceptance: CounterAcceptance::All,
        }
    }

    pub fn with_acceptance(mut self, acceptance: CounterAcceptance) -> Self {
        self.acceptance = acceptance;
        self
    }

    #[inline]
    pub fn accepts(&self, flight: &Flight) -> bool {
        self.acceptance.accepts(flight)
    }
}
