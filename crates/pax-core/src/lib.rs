//! `pax-core` — foundational types for the `rust_pax` departure-flow simulator.
//!
//! This crate is a dependency of every other `pax-*` crate.  It intentionally
//! has no `pax-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                                |
//! |------------|---------------------------------------------------------|
//! | [`ids`]    | `FlightId`, `PassengerId`, `CounterId`                  |
//! | [`time`]   | `Minute` (minute-of-day), boarding-close lead constant  |
//! | [`rng`]    | `SimRng`, deterministic stream-seed derivation          |
//! | [`params`] | `SimParams` + fail-fast validation                      |
//! | [`error`]  | `PaxError`, `PaxResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod ids;
pub mod params;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{PaxError, PaxResult};
pub use ids::{CounterId, FlightId, PassengerId};
pub use params::SimParams;
pub use rng::{SimRng, stream_seed};
pub use time::{BOARDING_CLOSE_LEAD_MINUTES, Minute};
