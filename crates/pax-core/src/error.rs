//! Framework error type.
//!
//! Sub-crates may define their own error enums and convert them into
//! `PaxError` via `From` impls, or keep them separate and wrap `PaxError` as
//! one variant.  Both patterns are acceptable; prefer whichever keeps error
//! sites clean.

use thiserror::Error;

use crate::FlightId;

/// The top-level error type for `pax-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum PaxError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("flight {0} not found")]
    UnknownFlight(FlightId),
}

/// Shorthand result type for all `pax-*` crates.
pub type PaxResult<T> = Result<T, PaxError>;
