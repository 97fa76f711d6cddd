//! Error and warning types for rectification.
//!
//! Three tiers: [`RectifyError`] is fatal and returned to the caller,
//! [`ComputationError`] fails a single probe and is recovered by skipping
//! it, and [`Warning`] records degraded input that never aborts a search.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use dhruv_core::EngineError;
use dhruv_time::TimeError;
use dhruv_vedic_base::{Graha, VedicError};
use serde::Serialize;

pub type Result<T, E = RectifyError> = std::result::Result<T, E>;

/// Fatal errors. No partial result accompanies them.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RectifyError {
    /// Missing or malformed birth data.
    #[error("invalid birth data: {message}")]
    Validation { message: String },
    /// The original birth time itself could not be scored.
    #[error("failed to score the original birth time: {0}")]
    Computation(#[from] ComputationError),
    #[error("failed to read config file at {path:?}")]
    ReadConfig {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file at {path:?}")]
    ParseConfig {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// Config parsed but holds out-of-range values.
    #[error("invalid config: {message}")]
    Config { message: String },
}

impl RectifyError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

/// Failure evaluating one candidate time.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum ComputationError {
    #[error("ephemeris: {0}")]
    Ephemeris(#[from] EngineError),
    #[error("vedic: {0}")]
    Vedic(#[from] VedicError),
    #[error("time: {0}")]
    Time(#[from] TimeError),
    /// A derived quantity came out NaN or infinite.
    #[error("non-finite {quantity} for {graha:?}")]
    NonFinite {
        graha: Option<Graha>,
        quantity: &'static str,
    },
    /// A collaborator could not supply what was asked.
    #[error("provider: {0}")]
    Provider(String),
}

/// Degraded-input conditions carried in the result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[non_exhaustive]
pub enum Warning {
    /// No events supplied; event correlation is excluded from confidence.
    NoEvents,
    /// An event was dropped before scoring.
    MalformedEvent { id: String, reason: String },
    /// No config file; built-in defaults are in effect.
    MissingConfig,
    /// Some probes of a pass failed and were skipped.
    ProbesSkipped {
        pass: u32,
        failed: usize,
        first_error: String,
    },
    /// Every probe of a pass failed; the previous best was kept.
    PassFailed { pass: u32 },
    /// The best adjustment exceeded the bound and was clamped.
    AdjustmentClamped {
        requested_minutes: f64,
        bound_minutes: f64,
    },
    /// The clamped time could not be scored; the original time was kept.
    ClampedScoreFailed { time: DateTime<Utc>, error: String },
    /// All component weights were zero; overall confidence is the 0.5 fallback.
    AggregationFallback,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoEvents => f.write_str("no life events supplied; event correlation excluded"),
            Self::MalformedEvent { id, reason } => write!(f, "event {id:?} skipped: {reason}"),
            Self::MissingConfig => f.write_str("no config supplied; using defaults"),
            Self::ProbesSkipped {
                pass,
                failed,
                first_error,
            } => write!(f, "pass {pass}: {failed} probe(s) failed ({first_error})"),
            Self::PassFailed { pass } => {
                write!(f, "pass {pass}: every probe failed; previous best kept")
            }
            Self::AdjustmentClamped {
                requested_minutes,
                bound_minutes,
            } => write!(
                f,
                "adjustment {requested_minutes:.2} min clamped to ±{bound_minutes} min"
            ),
            Self::ClampedScoreFailed { time, error } => {
                write!(f, "clamped time {time} could not be scored: {error}")
            }
            Self::AggregationFallback => {
                f.write_str("all component weights zero; neutral 0.5 confidence used")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_error_converts() {
        let err: ComputationError = EngineError::InvalidQuery("epoch").into();
        assert!(matches!(err, ComputationError::Ephemeris(_)));
        let fatal: RectifyError = err.into();
        assert!(fatal.to_string().contains("original birth time"));
    }

    #[test]
    fn warnings_render() {
        let w = Warning::AdjustmentClamped {
            requested_minutes: 42.5,
            bound_minutes: 30.0,
        };
        assert_eq!(w.to_string(), "adjustment 42.50 min clamped to ±30 min");
    }
}
