//! `pax-engine` — minute-by-minute departure-flow stepper for `rust_pax`.
//!
//! # Six-phase interval update
//!
//! ```text
//! for each simulated minute:
//!   ① Arrivals  — per flight: split the minute's arrivals into in-person
//!                 (→ shortest accepting ticket counter) and online
//!                 (→ shortest checkpoint); detect boarding close and mark
//!                 the flight's queued passengers missed.
//!   ② Ticket    — accrue each counter's rate; completions move to the
//!                 completed line and are scheduled into the transit delay.
//!   ③ Transit   — drain the ticket→checkpoint delay queue into the
//!                 shortest checkpoint lane.
//!   ④ Screen    — accrue each checkpoint's rate; completions are scheduled
//!                 into the hold-room delay.
//!   ⑤ Hold      — drain the checkpoint→hold delay queue; admit to the
//!                 flight's hold room, or mark missed if boarding closed.
//!   ⑥ Record    — append queue copies to the history log, purge missed
//!                 passengers from the active queues, advance the clock,
//!                 record metric series, capture a snapshot.
//! ```
//!
//! Phase order is load-bearing: a passenger can never advance two stages in
//! the same minute, because each service phase runs before the transition
//! that feeds the next stage.
//!
//! # Time travel
//!
//! Every computed interval leaves an [`EngineSnapshot`] behind, indexed 1:1
//! by interval number (index 0 is the pre-simulation state).  `rewind`,
//! `go_to_interval`, and stepping below the frontier are pure restores —
//! no recomputation.  Only stepping past the frontier simulates a new
//! minute.
//!
//! # Concurrency
//!
//! None.  Every operation is a synchronous, bounded-time call; pausing and
//! auto-run timing belong to whatever driver invokes the API.

pub mod builder;
pub mod delay;
pub mod engine;
pub mod error;
pub mod history;
pub mod lanes;
pub mod observer;
pub mod snapshot;
pub mod store;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use builder::EngineBuilder;
pub use delay::DelayQueue;
pub use engine::Engine;
pub use error::{EngineError, EngineResult};
pub use history::HistoryLog;
pub use lanes::{LaneSnapshot, ServiceBank};
pub use observer::{NoopObserver, StepObserver};
pub use snapshot::{EngineSnapshot, SnapshotStore};
pub use store::{Passenger, PassengerStore};
