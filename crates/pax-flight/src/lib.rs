//! `pax-flight` — per-run flight data for the `rust_pax` simulator.
//!
//! Everything in this crate is constructed once, before the engine exists,
//! and read-only thereafter:
//!
//! | Module       | Contents                                                |
//! |--------------|---------------------------------------------------------|
//! | [`flight`]   | `Flight`, `ShapeTag`, `FlightSchedule`                  |
//! | [`counter`]  | `TicketCounterConfig`, `CounterAcceptance`              |
//! | [`arrivals`] | `ArrivalGenerator` — seeded count-per-bin sequences     |

pub mod arrivals;
pub mod counter;
pub mod flight;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use arrivals::ArrivalGenerator;
pub use counter::{CounterAcceptance, TicketCounterConfig};
pub use flight::{Flight, FlightSchedule, ShapeTag};
