//! Core engine errors.

use crate::Body;

/// Errors from configuration or position evaluation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum EngineError {
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
    #[error("invalid query: {0}")]
    InvalidQuery(&'static str),
    /// Kepler's equation did not converge within the iteration limit.
    #[error("kepler solver did not converge for {body:?} at JD {epoch_jd}")]
    NoConvergence { body: Body, epoch_jd: f64 },
    /// A computed coordinate came out NaN or infinite.
    #[error("non-finite {quantity} for {body:?} at JD {epoch_jd}")]
    NonFinite {
        body: Body,
        quantity: &'static str,
        epoch_jd: f64,
    },
}
