//! Six-part planetary strength.
//!
//! | part        | source                                              |
//! |-------------|-----------------------------------------------------|
//! | positional  | dignity, shaped by distance from exaltation/debilitation |
//! | directional | house distance from the graha's strongest house     |
//! | temporal    | day/night strength at local mean time, weekday lord |
//! | motional    | speed relative to mean daily motion, capped at 1    |
//! | natural     | fixed per-graha constant                            |
//! | aspectual   | aspects received, weighted by aspect type           |
//!
//! Each part is in [0, 1]; the total is their weighted mean.

use std::collections::BTreeMap;

use dhruv_vedic_base::{
    Dignity, Graha, NaisargikaMaitri, angular_separation, debilitation_degree, dignity,
    distance_from_exaltation, naisargika_maitri, rashi_index_of, rashi_lord_by_index,
};
use serde::Serialize;

use crate::config::StrengthWeights;
use crate::error::ComputationError;
use crate::rules::{AspectTable, StrengthRules, WEEKDAY_LORDS};
use crate::types::{BodyPosition, ChartPositions};

/// Strength breakdown of one graha.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BodyStrength {
    pub positional: f64,
    pub directional: f64,
    pub temporal: f64,
    pub motional: f64,
    pub natural: f64,
    pub aspectual: f64,
    pub total: f64,
    pub dignity: Dignity,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrengthAnalysis {
    pub bodies: BTreeMap<Graha, BodyStrength>,
    /// Mean total strength over all grahas.
    pub score: f64,
    /// Mean of each part over all grahas.
    pub sub_components: BTreeMap<String, f64>,
}

impl StrengthAnalysis {
    pub fn total(&self, graha: Graha) -> f64 {
        self.bodies.get(&graha).map_or(0.0, |s| s.total)
    }

    pub fn strongest(&self) -> Option<Graha> {
        self.bodies
            .iter()
            .max_by(|a, b| a.1.total.total_cmp(&b.1.total))
            .map(|(g, _)| *g)
    }
}

#[derive(Debug, Clone, Default)]
pub struct PlanetaryStrengthEvaluator {
    rules: StrengthRules,
    aspects: AspectTable,
    weights: StrengthWeights,
}

impl PlanetaryStrengthEvaluator {
    pub fn new(rules: StrengthRules, aspects: AspectTable, weights: StrengthWeights) -> Self {
        Self {
            rules,
            aspects,
            weights,
        }
    }

    pub fn evaluate(&self, chart: &ChartPositions) -> Result<StrengthAnalysis, ComputationError> {
        let is_day = (6.0..18.0).contains(&chart.local_mean_hour());
        let weekday_lord = WEEKDAY_LORDS[chart.local_weekday() as usize % 7];

        let mut bodies = BTreeMap::new();
        for (graha, body) in &chart.bodies {
            let s = self.body_strength(chart, body, is_day, weekday_lord);
            if !s.total.is_finite() {
                return Err(ComputationError::NonFinite {
                    graha: Some(*graha),
                    quantity: "strength",
                });
            }
            bodies.insert(*graha, s);
        }

        let n = bodies.len().max(1) as f64;
        let mean = |f: fn(&BodyStrength) -> f64| bodies.values().map(f).sum::<f64>() / n;
        let sub_components = BTreeMap::from([
            ("positional".to_string(), mean(|s| s.positional)),
            ("directional".to_string(), mean(|s| s.directional)),
            ("temporal".to_string(), mean(|s| s.temporal)),
            ("motional".to_string(), mean(|s| s.motional)),
            ("natural".to_string(), mean(|s| s.natural)),
            ("aspectual".to_string(), mean(|s| s.aspectual)),
        ]);
        let score = mean(|s| s.total).clamp(0.0, 1.0);

        Ok(StrengthAnalysis {
            bodies,
            score,
            sub_components,
        })
    }

    fn body_strength(
        &self,
        chart: &ChartPositions,
        body: &BodyPosition,
        is_day: bool,
        weekday_lord: Graha,
    ) -> BodyStrength {
        let graha = body.graha;
        let dignity = dignity(graha, body.longitude);
        let positional = self.positional(graha, body.longitude, dignity);
        let directional = self.directional(graha, body.house);
        let temporal = self.temporal(graha, is_day, weekday_lord);
        let motional = self.motional(graha, body.speed);
        let natural = self.rules.natural.get(&graha).copied().unwrap_or(0.5);
        let aspectual = self.aspectual(chart, body);

        let w = &self.weights;
        let weight_sum =
            w.positional + w.directional + w.temporal + w.motional + w.natural + w.aspectual;
        let total = if weight_sum > 0.0 {
            (positional * w.positional
                + directional * w.directional
                + temporal * w.temporal
                + motional * w.motional
                + natural * w.natural
                + aspectual * w.aspectual)
                / weight_sum
        } else {
            0.5
        };

        BodyStrength {
            positional,
            directional,
            temporal,
            motional,
            natural,
            aspectual,
            total: total.clamp(0.0, 1.0),
            dignity,
        }
    }

    /// 1.0 at exact exaltation and 0.3 at exact debilitation, blending
    /// linearly into the sign baseline over the dignity orb.
    fn positional(&self, graha: Graha, lon: f64, dignity: Dignity) -> f64 {
        let r = &self.rules;
        let base = match dignity {
            Dignity::OwnSign => r.own_sign_score,
            Dignity::Neutral => {
                let lord = rashi_lord_by_index(rashi_index_of(lon));
                match lord.map(|lord| naisargika_maitri(graha, lord)) {
                    Some(NaisargikaMaitri::Friend) => r.neutral_score + r.sign_lord_delta,
                    Some(NaisargikaMaitri::Enemy) => r.neutral_score - r.sign_lord_delta,
                    _ => r.neutral_score,
                }
            }
            _ => r.neutral_score,
        };
        let from_exalt = distance_from_exaltation(graha, lon);
        let from_debil = angular_separation(lon, debilitation_degree(graha));
        let score = if from_exalt < r.dignity_orb {
            base + (1.0 - base) * (1.0 - from_exalt / r.dignity_orb)
        } else if from_debil < r.dignity_orb {
            base - (base - r.debilitation_score) * (1.0 - from_debil / r.dignity_orb)
        } else {
            base
        };
        score.clamp(0.0, 1.0)
    }

    fn directional(&self, graha: Graha, house: u8) -> f64 {
        let Some(&best) = self.rules.directional_house.get(&graha) else {
            return 0.5;
        };
        let diff = (house as i16 - best as i16).rem_euclid(12);
        let distance = diff.min(12 - diff) as f64;
        1.0 - distance / 6.0
    }

    fn temporal(&self, graha: Graha, is_day: bool, weekday_lord: Graha) -> f64 {
        let r = &self.rules;
        let base = if r.always_strong.contains(&graha) {
            0.75
        } else if r.diurnal.contains(&graha) == is_day {
            1.0
        } else {
            0.25
        };
        let bonus: f64 = if graha == weekday_lord { 0.25 } else { 0.0 };
        (base + bonus).min(1.0)
    }

    fn motional(&self, graha: Graha, speed: f64) -> f64 {
        match self.rules.mean_speed.get(&graha) {
            Some(&mean) if mean > 0.0 => (speed.abs() / mean).min(1.0),
            _ => 0.5,
        }
    }

    /// Mean aspect strength (value × tightness, in [−1, 1]) mapped onto
    /// [0, 1]; 0.5 when unaspected.
    fn aspectual(&self, chart: &ChartPositions, body: &BodyPosition) -> f64 {
        let strengths: Vec<f64> = chart
            .bodies
            .values()
            .filter(|other| other.graha != body.graha && !is_node_pair(body.graha, other.graha))
            .filter_map(|other| {
                self.aspects
                    .find(angular_separation(body.longitude, other.longitude))
            })
            .map(|(rule, tightness)| rule.value * tightness)
            .collect();
        if strengths.is_empty() {
            return 0.5;
        }
        let mean = strengths.iter().sum::<f64>() / strengths.len() as f64;
        ((1.0 + mean) / 2.0).clamp(0.0, 1.0)
    }
}

/// Rahu and Ketu are always opposed; that opposition carries no meaning.
pub(crate) fn is_node_pair(a: Graha, b: Graha) -> bool {
    matches!(
        (a, b),
        (Graha::Rahu, Graha::Ketu) | (Graha::Ketu, Graha::Rahu)
    )
}
