//! Top-level simulation parameters.

use crate::{PaxError, PaxResult};

/// Global configuration consumed by the engine at construction time.
///
/// All fields are read-only for the run.  Validation happens once, before
/// any simulation state exists — after that every navigation request clamps
/// instead of erroring.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimParams {
    /// Fraction of arrivals that buy in person and must pass a ticket
    /// counter.  Must lie in [0, 1].
    pub percent_in_person: f64,

    /// Number of security checkpoint lanes.  Must be ≥ 1.
    pub checkpoint_count: usize,

    /// Service rate of every checkpoint lane, passengers per minute.
    /// Fractional rates accumulate across minutes.
    pub checkpoint_rate: f64,

    /// Length of each flight's arrival window, in minutes before departure.
    pub arrival_span_minutes: u32,

    /// Interval granularity in minutes.  The stepper always advances one
    /// minute at a time; this only controls the coarse arrival table.
    pub interval_minutes: u32,

    /// Transit delay between ticket-counter completion and joining a
    /// checkpoint queue.
    pub transit_delay_minutes: u32,

    /// Transit delay between checkpoint completion and hold-room entry.
    pub hold_delay_minutes: u32,

    /// Master RNG seed.  The same seed always produces identical runs.
    pub seed: u64,
}

impl SimParams {
    /// Fail-fast validation, run before the engine builds any state.
    pub fn validate(&self) -> PaxResult<()> {
        if !(0.0..=1.0).contains(&self.percent_in_person) {
            return Err(PaxError::Config(format!(
                "percent_in_person must lie in [0, 1], got {}",
                self.percent_in_person
            )));
        }
        if self.checkpoint_count == 0 {
            return Err(PaxError::Config(
                "checkpoint_count must be at least 1".into(),
            ));
        }
        if self.interval_minutes == 0 {
            return Err(PaxError::Config("interval_minutes must be at least 1".into()));
        }
        if self.arrival_span_minutes == 0 {
            return Err(PaxError::Config(
                "arrival_span_minutes must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
