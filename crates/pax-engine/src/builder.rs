//! Fluent builder for constructing an [`Engine`].
//!
//! Construction is the only place a caller-facing error is expected: all
//! misconfiguration fails fast here, before any simulation state exists.
//! After `build()` succeeds, every navigation request clamps instead of
//! erroring.

use pax_core::{CounterId, PaxError, SimParams};
use pax_flight::{FlightSchedule, TicketCounterConfig};

use crate::{Engine, EngineError, EngineResult};

/// Builder for [`Engine`].
///
/// # Example
///
/// ```rust,ignore
/// let engine = EngineBuilder::new(params, schedule)
///     .counters(vec![
///         TicketCounterConfig::new(CounterId(0), 1.5),
///         TicketCounterConfig::new(CounterId(1), 0.5)
///             .with_acceptance(CounterAcceptance::only([FlightId(2)])),
///     ])
///     .build()?;
/// ```
pub struct EngineBuilder {
    params: SimParams,
    schedule: FlightSchedule,
    counters: Vec<TicketCounterConfig>,
}

impl EngineBuilder {
    pub fn new(params: SimParams, schedule: FlightSchedule) -> Self {
        Self {
            params,
            schedule,
            counters: Vec::new(),
        }
    }

    /// Supply the ticket-counter configuration.  May be omitted only for
    /// all-online runs (`percent_in_person == 0`).
    pub fn counters(mut self, counters: Vec<TicketCounterConfig>) -> Self {
        self.counters = counters;
        self
    }

    /// Validate all inputs and construct the engine, capturing the
    /// interval-0 snapshot.
    pub fn build(self) -> EngineResult<Engine> {
        let Self {
            params,
            schedule,
            mut counters,
        } = self;

        params.validate().map_err(EngineError::Params)?;

        if params.percent_in_person > 0.0 && counters.is_empty() {
            return Err(EngineError::NoTicketCounters {
                percent: params.percent_in_person,
            });
        }

        for f in &schedule {
            if !(0.0..=1.0).contains(&f.fill_ratio) {
                return Err(EngineError::FillRatioOutOfRange {
                    number: f.number.clone(),
                    fill: f.fill_ratio,
                });
            }
        }

        // Counter ids follow position, like flight ids in FlightSchedule;
        // allow-sets must reference flights that exist.
        for (i, c) in counters.iter_mut().enumerate() {
            c.id = CounterId(i as u16);
        }
        for c in &counters {
            if let Some(set) = c.acceptance.allow_set() {
                for &fid in set {
                    if schedule.get(fid).is_none() {
                        return Err(EngineError::Params(PaxError::UnknownFlight(fid)));
                    }
                }
            }
        }

        Ok(Engine::new(params, schedule, counters))
    }
}
