//! Error types for Vedic calculations.

use dhruv_core::EngineError;
use dhruv_time::TimeError;

/// Errors from Vedic base calculations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum VedicError {
    /// Error from the ephemeris engine.
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),
    /// Error from time conversion.
    #[error("time error: {0}")]
    Time(#[from] TimeError),
    /// Invalid geographic location parameter.
    #[error("invalid location: {0}")]
    InvalidLocation(&'static str),
    /// Input outside the domain of a calculation.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
}
