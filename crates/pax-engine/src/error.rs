use pax_core::PaxError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Params(#[from] PaxError),

    #[error("percent_in_person is {percent} but no ticket counters are configured")]
    NoTicketCounters { percent: f64 },

    #[error("flight {number} has fill ratio {fill}, must lie in [0, 1]")]
    FillRatioOutOfRange { number: String, fill: f64 },
}

pub type EngineResult<T> = Result<T, EngineError>;
