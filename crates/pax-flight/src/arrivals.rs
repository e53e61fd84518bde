//! `ArrivalGenerator` — seeded count-per-bin arrival sequences.
//!
//! # Contract
//!
//! Given a flight and a bin granularity, produce a sequence of non-negative
//! counts — one per bin across the arrival span — summing to the flight's
//! expected passenger total.  The sequence must be reproducible from nothing
//! but (flight, granularity, seed): the engine re-derives the per-minute
//! table after a full reset and the run must not change.
//!
//! # How
//!
//! Each expected passenger draws a uniform arrival minute in `[0, span)` from
//! a stream seeded by (global seed, flight id, granularity), then counts are
//! bucketed by granularity.  Two generators at different granularities over
//! the same flight produce independent draws; the engine only ever consumes
//! one granularity per generator, so the sequences never need to agree
//! bin-for-bin.

use pax_core::{SimRng, stream_seed};

use crate::Flight;

/// A restartable arrival-count generator for one (span, granularity) pair.
#[derive(Clone, Debug)]
pub struct ArrivalGenerator {
    span_minutes: u32,
    granularity_minutes: u32,
    seed: u64,
}

impl ArrivalGenerator {
    /// `granularity_minutes` must be ≥ 1 (validated upstream in `SimParams`).
    pub fn new(span_minutes: u32, granularity_minutes: u32, seed: u64) -> Self {
        Self {
            span_minutes,
            granularity_minutes,
            seed,
        }
    }

    /// Number of bins in every generated sequence.
    #[inline]
    pub fn bin_count(&self) -> usize {
        self.span_minutes.div_ceil(self.granularity_minutes) as usize
    }

    /// Generate the arrival counts for `flight`.
    ///
    /// Deterministic: the same flight, granularity, and seed always yield the
    /// same sequence.  Flights with zero expected passengers yield an
    /// all-zero sequence of the correct length.
    pub fn generate(&self, flight: &Flight) -> Vec<u32> {
        let mut bins = vec![0u32; self.bin_count()];
        let total = flight.expected_passengers();
        if total == 0 {
            return bins;
        }

        let salt = (flight.id.0 as u64) | ((self.granularity_minutes as u64) << 32);
        let mut rng = SimRng::new(stream_seed(self.seed, salt));
        for _ in 0..total {
            let minute = rng.gen_range(0..self.span_minutes);
            bins[(minute / self.granularity_minutes) as usize] += 1;
        }
        bins
    }
}
