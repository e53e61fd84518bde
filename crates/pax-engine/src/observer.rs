//! Observer trait for full-run progress reporting.
//!
//! All methods have default no-op implementations so implementors only need
//! to override what they care about.

use pax_core::FlightId;

/// Callbacks invoked by [`Engine::run_all`][crate::Engine::run_all] at
/// interval boundaries.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter;
///
/// impl StepObserver for ProgressPrinter {
///     fn on_interval_end(&mut self, interval: u32) {
///         if interval % 60 == 0 {
///             println!("simulated {interval} minutes");
///         }
///     }
/// }
/// ```
pub trait StepObserver {
    /// Called before an interval is simulated.
    fn on_interval_start(&mut self, _interval: u32) {}

    /// Called after an interval completes; `interval` is the new clock value.
    fn on_interval_end(&mut self, _interval: u32) {}

    /// Called when one or more flights closed boarding during the interval.
    fn on_flights_closed(&mut self, _flights: &[FlightId]) {}

    /// Called once after the final interval.
    fn on_run_end(&mut self, _final_interval: u32) {}
}

/// A [`StepObserver`] that does nothing.  Use when you need to call
/// `run_all` but don't want progress callbacks.
pub struct NoopObserver;

impl StepObserver for NoopObserver {}
