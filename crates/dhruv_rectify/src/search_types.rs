//! Value types produced by the rectification search.

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;

use crate::confidence::ConfidenceBreakdown;
use crate::elemental::ElementalAnalysis;
use crate::error::Warning;
use crate::events::EventAnalysis;
use crate::harmony::HarmonyAnalysis;
use crate::strength::StrengthAnalysis;
use crate::types::ChartPositions;

/// One scored probe. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BirthCandidate {
    pub test_time: DateTime<Utc>,
    pub positions: ChartPositions,
    pub elemental: ElementalAnalysis,
    pub strength: StrengthAnalysis,
    pub harmony: HarmonyAnalysis,
    pub events: Option<EventAnalysis>,
    pub confidence: ConfidenceBreakdown,
}

impl BirthCandidate {
    pub fn overall(&self) -> f64 {
        self.confidence.overall
    }
}

/// What one pass probed and found.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PassSummary {
    pub pass: u32,
    pub center: DateTime<Utc>,
    pub radius_minutes: f64,
    pub step_minutes: f64,
    pub probes: usize,
    pub failed: usize,
    /// `None` when every probe failed.
    pub best_confidence: Option<f64>,
    pub best_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchTrace {
    pub passes: Vec<PassSummary>,
    pub probes_evaluated: usize,
    pub cache_hits: usize,
    /// Stopped before `max_passes` because the pass best stopped moving.
    pub converged_early: bool,
}

/// Per-analyzer detail of the selected time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailedMetrics {
    pub tattwa_analysis: ElementalAnalysis,
    pub planetary_strength: StrengthAnalysis,
    pub chart_harmony: HarmonyAnalysis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_correlation: Option<EventAnalysis>,
}

impl DetailedMetrics {
    pub(crate) fn from_candidate(candidate: &BirthCandidate) -> Self {
        Self {
            tattwa_analysis: candidate.elemental.clone(),
            planetary_strength: candidate.strength.clone(),
            chart_harmony: candidate.harmony.clone(),
            event_correlation: candidate.events.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RectificationResult {
    pub original_time: DateTime<Utc>,
    pub rectified_time: DateTime<Utc>,
    /// Rectified time on the birth data's clock.
    pub rectified_local_time: DateTime<FixedOffset>,
    /// Confidence of the rectified time, in [0, 1].
    pub confidence: f64,
    pub original_confidence: f64,
    /// Signed; never beyond the configured bound.
    pub adjustment_minutes: f64,
    pub detailed_metrics: DetailedMetrics,
    pub breakdown: ConfidenceBreakdown,
    pub positions: ChartPositions,
    pub warnings: Vec<Warning>,
    pub search: SearchTrace,
}
