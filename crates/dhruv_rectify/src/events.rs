//! Correlation of dated life events with a candidate chart.
//!
//! Each event is scored from three angles: the dasha lords running when it
//! happened, the divisional chart that governs its kind of event, and the
//! KP sub-lord of the candidate ascendant. The three are blended with the
//! configured weights and sharpened by the event's intensity.

use std::collections::BTreeMap;

use dhruv_vedic_base::{Amsha, BeneficNature, Graha, kp_sub_lord, natural_benefic_malefic};
use serde::Serialize;

use crate::config::EventWeights;
use crate::error::ComputationError;
use crate::provider::{ActivePeriods, DashaPeriodProvider, DivisionalChart, DivisionalChartProvider};
use crate::rules::AffinityTable;
use crate::types::{ChartPositions, EventType, LifeEvent};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventScore {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: EventType,
    pub periods: ActivePeriods,
    pub dasha_score: f64,
    pub varga_score: f64,
    pub sub_lord_score: f64,
    /// Blended score after intensity sharpening, in [0, 1].
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventAnalysis {
    pub events: Vec<EventScore>,
    /// Mean event score.
    pub score: f64,
}

impl EventAnalysis {
    pub fn sub_components(&self) -> BTreeMap<String, f64> {
        let n = self.events.len().max(1) as f64;
        let mean = |f: fn(&EventScore) -> f64| self.events.iter().map(f).sum::<f64>() / n;
        BTreeMap::from([
            ("dasha".to_string(), mean(|e| e.dasha_score)),
            ("varga".to_string(), mean(|e| e.varga_score)),
            ("sub_lord".to_string(), mean(|e| e.sub_lord_score)),
        ])
    }
}

#[derive(Debug, Clone)]
pub struct EventCorrelationAnalyzer<D, V> {
    affinity: AffinityTable,
    weights: EventWeights,
    dasha: D,
    varga: V,
}

impl<D, V> EventCorrelationAnalyzer<D, V>
where
    D: DashaPeriodProvider,
    V: DivisionalChartProvider,
{
    pub fn new(affinity: AffinityTable, weights: EventWeights, dasha: D, varga: V) -> Self {
        Self {
            affinity,
            weights,
            dasha,
            varga,
        }
    }

    /// `None` when there are no events: the component is then excluded from
    /// aggregation rather than defaulted.
    pub fn analyze(
        &self,
        natal: &ChartPositions,
        events: &[LifeEvent],
    ) -> Result<Option<EventAnalysis>, ComputationError> {
        if events.is_empty() {
            return Ok(None);
        }

        let sub_lord = kp_sub_lord(natal.ascendant).sub_lord;
        let mut vargas: BTreeMap<Amsha, DivisionalChart> = BTreeMap::new();
        let mut scored = Vec::with_capacity(events.len());

        for event in events {
            let periods = self.dasha.active_periods(natal, event.timestamp)?;
            let dasha_score = self.dasha_score(event.kind, &periods);

            let (amsha, house) = self.affinity.varga_for(event.kind);
            let chart = vargas
                .entry(amsha)
                .or_insert_with(|| self.varga.chart(natal, amsha));
            let varga_score = varga_house_score(chart, house);

            let sub_lord_score = self.affinity.affinity(event.kind, sub_lord);

            let w = &self.weights;
            let weight_sum = w.dasha + w.varga + w.sub_lord;
            let raw = if weight_sum > 0.0 {
                (dasha_score * w.dasha + varga_score * w.varga + sub_lord_score * w.sub_lord)
                    / weight_sum
            } else {
                0.5
            };
            let score = sharpen(raw, event.intensity);
            if !score.is_finite() {
                return Err(ComputationError::NonFinite {
                    graha: None,
                    quantity: "event score",
                });
            }

            scored.push(EventScore {
                id: event.id.clone(),
                kind: event.kind,
                periods,
                dasha_score,
                varga_score,
                sub_lord_score,
                score,
            });
        }

        let score = scored.iter().map(|e| e.score).sum::<f64>() / scored.len() as f64;
        Ok(Some(EventAnalysis {
            events: scored,
            score,
        }))
    }

    /// Level-weighted affinity of the running lords; 0.5 outside any period.
    fn dasha_score(&self, kind: EventType, periods: &ActivePeriods) -> f64 {
        let w = &self.weights;
        let levels = [
            (periods.major, w.major),
            (periods.sub, w.sub),
            (periods.sub_sub, w.sub_sub),
        ];
        let (sum, weight) = levels
            .iter()
            .filter_map(|&(lord, weight)| lord.map(|g| (g, weight)))
            .fold((0.0, 0.0), |(sum, total), (g, weight)| {
                (sum + self.affinity.affinity(kind, g) * weight, total + weight)
            });
        if weight > 0.0 { sum / weight } else { 0.5 }
    }
}

/// Placement of the house lord plus benefic/malefic occupants.
fn varga_house_score(chart: &DivisionalChart, house: u8) -> f64 {
    let lord_score = match chart.house_lord(house).and_then(|g| chart.house_of(g)) {
        Some(1 | 4 | 5 | 7 | 9 | 10) => 1.0,
        Some(6 | 8 | 12) => 0.2,
        _ => 0.5,
    };
    let occupants: f64 = chart
        .occupants(house)
        .into_iter()
        .map(occupant_modifier)
        .sum();
    (lord_score + occupants).clamp(0.0, 1.0)
}

fn occupant_modifier(graha: Graha) -> f64 {
    match natural_benefic_malefic(graha) {
        BeneficNature::Benefic => 0.2,
        BeneficNature::Malefic => -0.1,
    }
}

/// Pull toward 0.5 for faint events, push away from it for intense ones.
fn sharpen(raw: f64, intensity: f64) -> f64 {
    (0.5 + (raw - 0.5) * (0.5 + intensity)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{ParashariVargaProvider, VimshottariProvider};
    use crate::testutil::chart_with;
    use chrono::{TimeZone, Utc};

    const EPS: f64 = 1e-9;

    /// Fixed lords regardless of time.
    struct FixedDasha(ActivePeriods);

    impl DashaPeriodProvider for FixedDasha {
        fn active_periods(
            &self,
            _natal: &ChartPositions,
            _time: chrono::DateTime<Utc>,
        ) -> Result<ActivePeriods, ComputationError> {
            Ok(self.0)
        }
    }

    struct FailingDasha;

    impl DashaPeriodProvider for FailingDasha {
        fn active_periods(
            &self,
            _natal: &ChartPositions,
            _time: chrono::DateTime<Utc>,
        ) -> Result<ActivePeriods, ComputationError> {
            Err(ComputationError::Provider("offline".to_string()))
        }
    }

    fn event(id: &str, kind: EventType, year: i32, intensity: f64) -> LifeEvent {
        LifeEvent {
            id: id.to_string(),
            kind,
            timestamp: Utc.with_ymd_and_hms(year, 5, 1, 0, 0, 0).unwrap(),
            intensity,
            description: String::new(),
        }
    }

    fn natal() -> ChartPositions {
        chart_with(&[
            (Graha::Surya, 280.0),
            (Graha::Chandra, 45.0),
            (Graha::Mangal, 120.0),
            (Graha::Buddh, 265.0),
            (Graha::Guru, 10.0),
            (Graha::Shukra, 300.0),
            (Graha::Shani, 40.0),
            (Graha::Rahu, 100.0),
            (Graha::Ketu, 280.0),
        ])
    }

    #[test]
    fn no_events_is_excluded() {
        let a = EventCorrelationAnalyzer::new(
            AffinityTable::default(),
            EventWeights::default(),
            VimshottariProvider,
            ParashariVargaProvider,
        );
        assert!(a.analyze(&natal(), &[]).unwrap().is_none());
    }

    #[test]
    fn per_event_scores_in_unit_range() {
        let a = EventCorrelationAnalyzer::new(
            AffinityTable::default(),
            EventWeights::default(),
            VimshottariProvider,
            ParashariVargaProvider,
        );
        let events = [
            event("c", EventType::Career, 2015, 0.9),
            event("r", EventType::Relationship, 2016, 0.3),
        ];
        let analysis = a.analyze(&natal(), &events).unwrap().unwrap();
        assert_eq!(analysis.events.len(), 2);
        for e in &analysis.events {
            assert!((0.0..=1.0).contains(&e.score), "{e:?}");
            assert!(!e.periods.is_empty());
        }
        let mean = (analysis.events[0].score + analysis.events[1].score) / 2.0;
        assert!((analysis.score - mean).abs() < EPS);
    }

    #[test]
    fn dasha_score_weights_available_levels() {
        let periods = ActivePeriods {
            major: Some(Graha::Surya),
            sub: Some(Graha::Shani),
            sub_sub: None,
        };
        let a = EventCorrelationAnalyzer::new(
            AffinityTable::default(),
            EventWeights::default(),
            FixedDasha(periods),
            ParashariVargaProvider,
        );
        // (1.0 × 0.3 + 0.9 × 0.4) / 0.7
        let expected = (0.3 + 0.36) / 0.7;
        assert!((a.dasha_score(EventType::Career, &periods) - expected).abs() < EPS);
        assert_eq!(a.dasha_score(EventType::Career, &ActivePeriods::default()), 0.5);
    }

    #[test]
    fn intensity_sharpens() {
        assert!((sharpen(0.8, 0.5) - 0.8).abs() < EPS);
        assert!((sharpen(0.8, 1.0) - 0.95).abs() < EPS);
        assert!((sharpen(0.8, 0.0) - 0.65).abs() < EPS);
        assert_eq!(sharpen(1.0, 1.0), 1.0);
    }

    #[test]
    fn provider_failure_propagates() {
        let a = EventCorrelationAnalyzer::new(
            AffinityTable::default(),
            EventWeights::default(),
            FailingDasha,
            ParashariVargaProvider,
        );
        let err = a
            .analyze(&natal(), &[event("x", EventType::Health, 2010, 0.5)])
            .unwrap_err();
        assert!(matches!(err, ComputationError::Provider(_)));
    }

    #[test]
    fn dropping_an_event_changes_the_mean() {
        let a = EventCorrelationAnalyzer::new(
            AffinityTable::default(),
            EventWeights::default(),
            FixedDasha(ActivePeriods {
                major: Some(Graha::Surya),
                sub: Some(Graha::Shukra),
                sub_sub: Some(Graha::Ketu),
            }),
            ParashariVargaProvider,
        );
        let both = [
            event("c", EventType::Career, 2015, 1.0),
            event("r", EventType::Relationship, 2015, 1.0),
        ];
        let full = a.analyze(&natal(), &both).unwrap().unwrap();
        let single = a.analyze(&natal(), &both[..1]).unwrap().unwrap();
        assert!((full.score - single.score).abs() > 1e-6);
    }
}
