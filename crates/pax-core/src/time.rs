//! Simulation time model.
//!
//! # Design
//!
//! Simulation time is a logical interval counter (one interval = one minute),
//! stored as a bare `u32` in the engine and advanced only on demand.  This
//! module holds the wall-clock side: flight departures are expressed as a
//! `Minute` — a minute-of-day, 0..=1439 in normal use.
//!
//! The engine anchors its interval 0 at a *global start* minute (earliest
//! departure minus the arrival span).  Offsets relative to that anchor can go
//! negative for flights whose boarding closes before the anchor, so all
//! anchor-relative arithmetic is done in `i64` via [`Minute::as_i64`].  There
//! is deliberately no midnight wrap-around: a run is a single contiguous
//! stretch of minutes.

use std::fmt;

/// Boarding closes this many minutes before scheduled departure.  Passengers
/// of a closed flight that have not reached the hold room are purged.
pub const BOARDING_CLOSE_LEAD_MINUTES: u32 = 20;

// ── Minute ───────────────────────────────────────────────────────────────────

/// A wall-clock minute-of-day (e.g. 465 = 07:45).
///
/// Stored as `u32`; values ≥ 1440 are permitted (a red-eye schedule may run
/// past midnight) but `Display` renders modulo 24 h.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Minute(pub u32);

impl Minute {
    pub const MIDNIGHT: Minute = Minute(0);

    /// Build from an (hour, minute) pair.
    #[inline]
    pub fn from_hm(hour: u32, minute: u32) -> Minute {
        Minute(hour * 60 + minute)
    }

    /// Widen to `i64` for anchor-relative arithmetic that may go negative.
    #[inline]
    pub fn as_i64(self) -> i64 {
        self.0 as i64
    }

    /// The minute `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u32) -> Minute {
        Minute(self.0 + n)
    }

    /// Boarding-close minute for a departure at `self`, as an `i64` so that
    /// departures inside the first 20 minutes of the day stay representable.
    #[inline]
    pub fn boarding_close(self) -> i64 {
        self.as_i64() - BOARDING_CLOSE_LEAD_MINUTES as i64
    }
}

impl std::ops::Add<u32> for Minute {
    type Output = Minute;
    #[inline]
    fn add(self, rhs: u32) -> Minute {
        Minute(self.0 + rhs)
    }
}

impl std::ops::Sub for Minute {
    type Output = i64;
    /// Signed minute difference — negative when `rhs` is later.
    #[inline]
    fn sub(self, rhs: Minute) -> i64 {
        self.as_i64() - rhs.as_i64()
    }
}

impl fmt::Display for Minute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.0 % 1440;
        write!(f, "{:02}:{:02}", m / 60, m % 60)
    }
}
