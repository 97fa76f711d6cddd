//! Coarse-to-fine rectification search.
//!
//! Pass 0 probes the configured window around the stated birth time. Each
//! later pass recentres on the running best, shrinks the radius to
//! `R0 / (pass + 1)` and probes twenty steps across it. The search stops
//! early once the best confidence of a pass moves by less than the
//! precision threshold.
//!
//! An optimum beyond the adjustment bound is pulled back to the bound and
//! re-scored; that time and score are reported even when they fall below
//! the stated time's own.
//!
//! A failing probe is skipped; a pass in which every probe fails keeps the
//! previous best. Only a failure to score the stated time itself aborts.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use dhruv_vedic_base::GeoLocation;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::cache::ProbeCache;
use crate::confidence::ConfidenceAggregator;
use crate::config::{self, RectifyConfig};
use crate::elemental::ElementalBalanceAnalyzer;
use crate::error::{ComputationError, RectifyError, Result, Warning};
use crate::events::EventCorrelationAnalyzer;
use crate::harmony::ChartHarmonyEvaluator;
use crate::progress::{NoProgress, ProgressEvent, ProgressSink, ProgressStatus};
use crate::provider::{
    DashaPeriodProvider, DivisionalChartProvider, EphemerisProvider, ParashariVargaProvider,
    PositionProvider, VimshottariProvider,
};
use crate::rules::{AffinityTable, AspectTable, ElementRules, StrengthRules, YogaRules};
use crate::search_types::{
    BirthCandidate, DetailedMetrics, PassSummary, RectificationResult, SearchTrace,
};
use crate::strength::PlanetaryStrengthEvaluator;
use crate::types::{
    BirthData, LifeEvent, ResolvedBirth, SearchWindow, minutes_between, shift_minutes,
};

/// Steps per pass after the first.
const REFINE_STEPS: f64 = 20.0;

/// Every rule table the analyzers read.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    pub elements: ElementRules,
    pub strength: StrengthRules,
    pub aspects: AspectTable,
    pub yogas: YogaRules,
    pub affinity: AffinityTable,
}

/// Search engine generic over its three collaborators.
#[derive(Debug, Clone)]
pub struct RectificationEngine<P, D, V> {
    config: RectifyConfig,
    positions: P,
    strength: PlanetaryStrengthEvaluator,
    elemental: ElementalBalanceAnalyzer,
    harmony: ChartHarmonyEvaluator,
    events: EventCorrelationAnalyzer<D, V>,
    aggregator: ConfidenceAggregator,
}

/// Engine wired to the analytic ephemeris, Vimshottari and Parashari vargas.
pub type DefaultEngine =
    RectificationEngine<EphemerisProvider, VimshottariProvider, ParashariVargaProvider>;

impl DefaultEngine {
    pub fn with_defaults(config: RectifyConfig) -> Result<Self> {
        let positions = EphemerisProvider::with_chart_config(config.chart.clone())
            .map_err(|err| RectifyError::config(format!("ephemeris setup: {err}")))?;
        Self::new(config, positions, VimshottariProvider, ParashariVargaProvider)
    }
}

impl<P, D, V> RectificationEngine<P, D, V>
where
    P: PositionProvider,
    D: DashaPeriodProvider,
    V: DivisionalChartProvider,
{
    /// Validates `config` and builds the analyzers with the classical rules.
    pub fn new(config: RectifyConfig, positions: P, dasha: D, varga: V) -> Result<Self> {
        Self::with_rules(config, RuleSet::default(), positions, dasha, varga)
    }

    pub fn with_rules(
        config: RectifyConfig,
        rules: RuleSet,
        positions: P,
        dasha: D,
        varga: V,
    ) -> Result<Self> {
        config::validate(&config)?;
        Ok(Self {
            strength: PlanetaryStrengthEvaluator::new(
                rules.strength,
                rules.aspects.clone(),
                config.strength.clone(),
            ),
            elemental: ElementalBalanceAnalyzer::new(rules.elements, config.elemental.clone()),
            harmony: ChartHarmonyEvaluator::new(rules.aspects, rules.yogas, config.harmony.clone()),
            events: EventCorrelationAnalyzer::new(
                rules.affinity,
                config.events.clone(),
                dasha,
                varga,
            ),
            aggregator: ConfidenceAggregator::new(config.weights.clone()),
            positions,
            config,
        })
    }

    pub fn config(&self) -> &RectifyConfig {
        &self.config
    }

    /// Score a single candidate time.
    pub fn evaluate_at(
        &self,
        time: DateTime<Utc>,
        location: &GeoLocation,
        events: &[LifeEvent],
    ) -> std::result::Result<BirthCandidate, ComputationError> {
        let positions = self.positions.compute(time, location)?;
        let strength = self.strength.evaluate(&positions)?;
        let elemental = self.elemental.analyze(&positions, &strength)?;
        let harmony = self.harmony.evaluate(&positions)?;
        let events = self.events.analyze(&positions, events)?;
        let confidence = self
            .aggregator
            .aggregate(&elemental, &strength, &harmony, events.as_ref());
        if !confidence.overall.is_finite() {
            return Err(ComputationError::NonFinite {
                graha: None,
                quantity: "confidence",
            });
        }

        Ok(BirthCandidate {
            test_time: time,
            positions,
            elemental,
            strength,
            harmony,
            events,
            confidence,
        })
    }

    pub fn rectify(&self, birth: &BirthData, events: &[LifeEvent]) -> Result<RectificationResult> {
        self.rectify_with_progress(birth, events, &NoProgress)
    }

    pub fn rectify_with_progress(
        &self,
        birth: &BirthData,
        events: &[LifeEvent],
        progress: &dyn ProgressSink,
    ) -> Result<RectificationResult> {
        let resolved = birth.resolve()?;
        let location = resolved.location;
        let search = &self.config.search;
        let mut warnings = Vec::new();

        let events = self.screen_events(&resolved, events, &mut warnings);
        if events.is_empty() {
            warnings.push(Warning::NoEvents);
        }

        info!(
            birth = %resolved.utc,
            events = events.len(),
            radius_minutes = search.radius_minutes,
            step_minutes = search.step_minutes,
            max_passes = search.max_passes,
            "starting rectification"
        );
        progress.report(&ProgressEvent::new(
            ProgressStatus::Started,
            0.0,
            "scoring stated birth time",
        ));

        let cache = search.cache.then(ProbeCache::new);
        let original = self.score(cache.as_ref(), resolved.utc, &location, &events)?;

        let mut best = Arc::clone(&original);
        let mut trace = SearchTrace::default();
        let mut previous_pass_best: Option<f64> = None;

        for pass in 0..search.max_passes {
            let (radius, step) = if pass == 0 {
                (search.radius_minutes, search.step_minutes)
            } else {
                let radius = search.radius_minutes / f64::from(pass + 1);
                (radius, radius / REFINE_STEPS)
            };
            let window = SearchWindow {
                center: best.test_time,
                radius_minutes: radius,
                step_minutes: step,
            };
            let times = window.probes();
            let outcomes = self.probe_all(cache.as_ref(), &times, &location, &events);
            trace.probes_evaluated += times.len();

            let mut scored = Vec::with_capacity(outcomes.len());
            let mut first_error: Option<String> = None;
            for (time, outcome) in times.iter().zip(outcomes) {
                match outcome {
                    Ok(candidate) => scored.push(candidate),
                    Err(err) => {
                        warn!(pass, probe = %time, error = %err, "probe failed; skipped");
                        first_error.get_or_insert_with(|| err.to_string());
                    }
                }
            }
            let failed = times.len() - scored.len();

            let pass_best = select_best(&scored, window.center);
            trace.passes.push(PassSummary {
                pass,
                center: window.center,
                radius_minutes: radius,
                step_minutes: step,
                probes: times.len(),
                failed,
                best_confidence: pass_best.map(|c| c.overall()),
                best_time: pass_best.map(|c| c.test_time),
            });

            let Some(pass_best) = pass_best.cloned() else {
                warn!(pass, probes = times.len(), "every probe failed; keeping previous best");
                warnings.push(Warning::PassFailed { pass });
                continue;
            };
            if let Some(first_error) = first_error {
                warnings.push(Warning::ProbesSkipped {
                    pass,
                    failed,
                    first_error,
                });
            }

            let pass_confidence = pass_best.overall();
            if pass_confidence > best.overall() {
                best = pass_best;
            }
            debug!(
                pass,
                radius_minutes = radius,
                step_minutes = step,
                probes = times.len(),
                failed,
                confidence = pass_confidence,
                best = %best.test_time,
                "pass complete"
            );
            progress.report(&ProgressEvent::new(
                ProgressStatus::Running,
                f64::from(pass + 1) / f64::from(search.max_passes),
                format!("pass {} of {}", pass + 1, search.max_passes),
            ));

            if pass > 0
                && previous_pass_best
                    .is_some_and(|prev| (pass_confidence - prev).abs() < search.precision_threshold)
            {
                trace.converged_early = pass + 1 < search.max_passes;
                debug!(pass, "pass best stable; stopping");
                break;
            }
            previous_pass_best = Some(pass_confidence);
        }

        let chosen = if best.overall() > original.overall() {
            self.bound_adjustment(
                cache.as_ref(),
                &resolved,
                &original,
                best,
                &events,
                &mut warnings,
            )
        } else {
            Arc::clone(&original)
        };
        if chosen.confidence.fallback {
            warnings.push(Warning::AggregationFallback);
        }

        trace.cache_hits = cache.as_ref().map_or(0, ProbeCache::hits);
        let adjustment_minutes = minutes_between(resolved.utc, chosen.test_time);
        info!(
            rectified = %chosen.test_time,
            adjustment_minutes,
            confidence = chosen.overall(),
            original_confidence = original.overall(),
            probes = trace.probes_evaluated,
            "rectification finished"
        );
        progress.report(&ProgressEvent::new(ProgressStatus::Completed, 1.0, "done"));

        Ok(RectificationResult {
            original_time: resolved.utc,
            rectified_time: chosen.test_time,
            rectified_local_time: resolved.local(chosen.test_time),
            confidence: chosen.overall(),
            original_confidence: original.overall(),
            adjustment_minutes,
            detailed_metrics: DetailedMetrics::from_candidate(&chosen),
            breakdown: chosen.confidence.clone(),
            positions: chosen.positions.clone(),
            warnings,
            search: trace,
        })
    }

    fn score(
        &self,
        cache: Option<&ProbeCache>,
        time: DateTime<Utc>,
        location: &GeoLocation,
        events: &[LifeEvent],
    ) -> std::result::Result<Arc<BirthCandidate>, ComputationError> {
        if let Some(hit) = cache.and_then(|c| c.get(time, location)) {
            return Ok(hit);
        }
        let candidate = Arc::new(self.evaluate_at(time, location, events)?);
        if let Some(cache) = cache {
            cache.insert(location, Arc::clone(&candidate));
        }
        Ok(candidate)
    }

    /// Results come back in probe order regardless of completion order.
    fn probe_all(
        &self,
        cache: Option<&ProbeCache>,
        times: &[DateTime<Utc>],
        location: &GeoLocation,
        events: &[LifeEvent],
    ) -> Vec<std::result::Result<Arc<BirthCandidate>, ComputationError>> {
        if self.config.search.parallel {
            times
                .par_iter()
                .map(|t| self.score(cache, *t, location, events))
                .collect()
        } else {
            times
                .iter()
                .map(|t| self.score(cache, *t, location, events))
                .collect()
        }
    }

    /// Clamp the adjustment to the bound, re-scoring the clamped time. The
    /// clamped candidate stands whatever it scores; the original is kept
    /// only when the clamped time cannot be scored.
    fn bound_adjustment(
        &self,
        cache: Option<&ProbeCache>,
        birth: &ResolvedBirth,
        original: &Arc<BirthCandidate>,
        best: Arc<BirthCandidate>,
        events: &[LifeEvent],
        warnings: &mut Vec<Warning>,
    ) -> Arc<BirthCandidate> {
        let bound = self.config.search.max_adjustment_minutes;
        let requested = minutes_between(birth.utc, best.test_time);
        if requested.abs() <= bound {
            return best;
        }

        let clamped = birth.utc + TimeDelta::milliseconds(clamped_offset_millis(requested, bound));
        warn!(
            requested_minutes = requested,
            bound_minutes = bound,
            "adjustment clamped"
        );
        warnings.push(Warning::AdjustmentClamped {
            requested_minutes: requested,
            bound_minutes: bound,
        });
        match self.score(cache, clamped, &birth.location, events) {
            Ok(candidate) => candidate,
            Err(err) => {
                warn!(time = %clamped, error = %err, "clamped time failed to score");
                warnings.push(Warning::ClampedScoreFailed {
                    time: clamped,
                    error: err.to_string(),
                });
                Arc::clone(original)
            }
        }
    }

    /// Drop events that cannot be scored, recording why.
    fn screen_events(
        &self,
        birth: &ResolvedBirth,
        events: &[LifeEvent],
        warnings: &mut Vec<Warning>,
    ) -> Vec<LifeEvent> {
        let earliest = shift_minutes(birth.utc, -self.config.search.max_adjustment_minutes);
        let mut seen = BTreeSet::new();
        let mut kept = Vec::with_capacity(events.len());

        for event in events {
            let reason = if event.id.trim().is_empty() {
                Some("empty id".to_string())
            } else if !event.intensity.is_finite() || !(0.0..=1.0).contains(&event.intensity) {
                Some(format!("intensity {} outside [0, 1]", event.intensity))
            } else if seen.contains(&event.id) {
                Some("duplicate id".to_string())
            } else if event.timestamp < earliest {
                Some(format!("timestamp {} precedes the birth window", event.timestamp))
            } else {
                None
            };

            match reason {
                Some(reason) => {
                    warn!(id = %event.id, %reason, "event skipped");
                    warnings.push(Warning::MalformedEvent {
                        id: event.id.clone(),
                        reason,
                    });
                }
                None => {
                    seen.insert(event.id.clone());
                    kept.push(event.clone());
                }
            }
        }
        kept
    }
}

/// `requested` minutes clamped to ±`bound`, truncated toward zero to whole
/// milliseconds so the result never exceeds the bound.
fn clamped_offset_millis(requested: f64, bound: f64) -> i64 {
    let ms = (requested.clamp(-bound, bound) * 60_000.0).trunc() as i64;
    if (ms as f64 / 60_000.0).abs() > bound {
        ms - ms.signum()
    } else {
        ms
    }
}

/// Highest confidence; ties go to the probe nearest `anchor`, then the
/// earlier probe.
fn select_best(
    candidates: &[Arc<BirthCandidate>],
    anchor: DateTime<Utc>,
) -> Option<&Arc<BirthCandidate>> {
    let distance = |c: &BirthCandidate| (c.test_time - anchor).num_milliseconds().abs();
    candidates.iter().max_by(|a, b| {
        a.overall()
            .total_cmp(&b.overall())
            .then_with(|| distance(b).cmp(&distance(a)))
            .then_with(|| b.test_time.cmp(&a.test_time))
    })
}
