//! Birth-time rectification.
//!
//! Given an approximate birth time, a place and optional dated life events,
//! [`RectificationEngine`] searches a window around the stated time for the
//! instant whose chart scores the highest confidence. Confidence blends four
//! analyzers:
//!
//! - [`ElementalBalanceAnalyzer`]: five-element distribution
//! - [`PlanetaryStrengthEvaluator`]: six-part strength per graha
//! - [`ChartHarmonyEvaluator`]: aspects, house spread, yogas
//! - [`EventCorrelationAnalyzer`]: dasha lords and vargas at each event
//!
//! combined by [`ConfidenceAggregator`]. Positions, dasha periods and
//! divisional charts come from the [`PositionProvider`],
//! [`DashaPeriodProvider`] and [`DivisionalChartProvider`] seams.

pub mod cache;
pub mod confidence;
pub mod config;
pub mod elemental;
pub mod error;
pub mod events;
pub mod harmony;
pub mod progress;
pub mod provider;
pub mod rules;
pub mod search;
pub mod search_types;
pub mod strength;
pub mod types;

#[cfg(test)]
mod testutil;

pub use cache::ProbeCache;
pub use confidence::{
    ComponentScore, ConfidenceAggregator, ConfidenceBreakdown, Priority, Suggestion,
};
pub use config::{
    ChartConfig, ComponentWeights, ElementalWeights, EventWeights, HarmonyWeights,
    RectifyConfig, SearchConfig, StrengthWeights,
};
pub use elemental::{CyclicInfluence, ElementalAnalysis, ElementalBalanceAnalyzer};
pub use error::{ComputationError, RectifyError, Result, Warning};
pub use events::{EventAnalysis, EventCorrelationAnalyzer, EventScore};
pub use harmony::{AspectHit, ChartHarmonyEvaluator, HarmonyAnalysis, Yoga};
pub use progress::{LogProgress, NoProgress, ProgressEvent, ProgressSink, ProgressStatus};
pub use provider::{
    ActivePeriods, DashaPeriodProvider, DivisionalChart, DivisionalChartProvider,
    EphemerisProvider, ParashariVargaProvider, PositionProvider, VimshottariProvider,
};
pub use rules::{
    AffinityTable, AspectKind, AspectRule, AspectTable, ElementRelation, ElementRules,
    StrengthRules, YogaRules,
};
pub use search::{DefaultEngine, RectificationEngine, RuleSet};
pub use search_types::{
    BirthCandidate, DetailedMetrics, PassSummary, RectificationResult, SearchTrace,
};
pub use strength::{BodyStrength, PlanetaryStrengthEvaluator, StrengthAnalysis};
pub use types::{
    ALL_ELEMENTS, BirthData, BodyPosition, ChartPositions, Element, ElementDistribution,
    EventType, LifeEvent, ResolvedBirth, SearchWindow,
};
