//! Deterministic RNG streams.
//!
//! # Determinism strategy
//!
//! Every randomized component gets its own independent `SmallRng` seeded by:
//!
//!   seed = global_seed XOR (salt * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive salts uniformly across the seed space.  This
//! means:
//!
//! - Streams never share RNG state, so no component's draw count disturbs
//!   another's sequence.
//! - A stream can be re-created from (global seed, salt) at any time and
//!   will replay the identical sequence — the arrival generator relies on
//!   this to stay restartable without carrying external state.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Derive an independent stream seed from the run's global seed and a salt
/// (e.g. a flight id, or a flight id combined with a granularity).
#[inline]
pub fn stream_seed(global_seed: u64, salt: u64) -> u64 {
    global_seed ^ salt.wrapping_mul(MIXING_CONSTANT)
}

// ── SimRng ────────────────────────────────────────────────────────────────────

/// A deterministic RNG stream.
///
/// Used only in single-threaded contexts — the engine is strictly sequential.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Create the stream identified by (global seed, salt).
    pub fn from_stream(global_seed: u64, salt: u64) -> Self {
        SimRng::new(stream_seed(global_seed, salt))
    }

    /// Expose the inner `SmallRng` for use with `rand` distribution types.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }
}
