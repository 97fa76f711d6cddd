//! Chart harmony: aspects between grahas, spread over the houses and yogas.

use std::collections::BTreeMap;

use dhruv_vedic_base::{Dignity, Graha, angular_separation, dignity, is_kendra};
use serde::Serialize;

use crate::config::HarmonyWeights;
use crate::error::ComputationError;
use crate::rules::{AspectKind, AspectTable, YogaRules};
use crate::strength::is_node_pair;
use crate::types::ChartPositions;

/// One aspect found between two grahas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AspectHit {
    pub from: Graha,
    pub to: Graha,
    pub kind: AspectKind,
    /// 1 when exact, 0 at the edge of the orb.
    pub tightness: f64,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Yoga {
    /// Jupiter in a kendra from the Moon.
    Gajakesari,
    /// Sun and Mercury in one sign.
    Budhaditya,
    /// Moon and Mars in one sign.
    ChandraMangala,
    Ruchaka,
    Bhadra,
    Hamsa,
    Malavya,
    Sasa,
    /// Benefics in the 6th, 7th and 8th from the Moon.
    Adhi,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HarmonyAnalysis {
    pub aspect_harmony: f64,
    pub house_balance: f64,
    pub yoga_strength: f64,
    pub aspects: Vec<AspectHit>,
    pub yogas: Vec<Yoga>,
    pub score: f64,
}

impl HarmonyAnalysis {
    pub fn sub_components(&self) -> BTreeMap<String, f64> {
        BTreeMap::from([
            ("aspects".to_string(), self.aspect_harmony),
            ("houses".to_string(), self.house_balance),
            ("yogas".to_string(), self.yoga_strength),
        ])
    }
}

#[derive(Debug, Clone, Default)]
pub struct ChartHarmonyEvaluator {
    aspects: AspectTable,
    yogas: YogaRules,
    weights: HarmonyWeights,
}

impl ChartHarmonyEvaluator {
    pub fn new(aspects: AspectTable, yogas: YogaRules, weights: HarmonyWeights) -> Self {
        Self {
            aspects,
            yogas,
            weights,
        }
    }

    pub fn evaluate(&self, chart: &ChartPositions) -> Result<HarmonyAnalysis, ComputationError> {
        let aspects = self.find_aspects(chart);
        let aspect_harmony = if aspects.is_empty() {
            0.5
        } else {
            let mean =
                aspects.iter().map(|a| a.value * a.tightness).sum::<f64>() / aspects.len() as f64;
            ((mean + 1.0) / 2.0).clamp(0.0, 1.0)
        };

        let house_balance = house_balance(chart);
        let yogas = detect_yogas(chart, &self.yogas);
        let yoga_strength = (yogas.len() as f64 * self.yogas.per_yoga).min(1.0);

        let w = &self.weights;
        let weight_sum = w.aspects + w.houses + w.yogas;
        let score = if weight_sum > 0.0 {
            (aspect_harmony * w.aspects + house_balance * w.houses + yoga_strength * w.yogas)
                / weight_sum
        } else {
            0.5
        };
        if !score.is_finite() {
            return Err(ComputationError::NonFinite {
                graha: None,
                quantity: "harmony",
            });
        }

        Ok(HarmonyAnalysis {
            aspect_harmony,
            house_balance,
            yoga_strength,
            aspects,
            yogas,
            score: score.clamp(0.0, 1.0),
        })
    }

    fn find_aspects(&self, chart: &ChartPositions) -> Vec<AspectHit> {
        let bodies: Vec<_> = chart.bodies.values().collect();
        let mut hits = Vec::new();
        for (i, a) in bodies.iter().enumerate() {
            for b in &bodies[i + 1..] {
                if is_node_pair(a.graha, b.graha) {
                    continue;
                }
                let sep = angular_separation(a.longitude, b.longitude);
                if let Some((rule, tightness)) = self.aspects.find(sep) {
                    hits.push(AspectHit {
                        from: a.graha,
                        to: b.graha,
                        kind: rule.kind,
                        tightness,
                        value: rule.value,
                    });
                }
            }
        }
        hits
    }
}

/// 0.7 × occupancy evenness (normalized entropy) + 0.3 × kendra emphasis.
fn house_balance(chart: &ChartPositions) -> f64 {
    let n = chart.bodies.len();
    if n == 0 {
        return 0.5;
    }
    let mut counts = [0usize; 12];
    for body in chart.bodies.values() {
        counts[(body.house.clamp(1, 12) - 1) as usize] += 1;
    }

    let evenness = if n < 2 {
        1.0
    } else {
        let entropy: f64 = counts
            .iter()
            .filter(|&&c| c > 0)
            .map(|&c| {
                let p = c as f64 / n as f64;
                -p * p.ln()
            })
            .sum();
        entropy / (n.min(12) as f64).ln()
    };

    let angular = chart
        .bodies
        .values()
        .filter(|b| is_kendra(b.house))
        .count();
    let kendra = (angular as f64 / 3.0).min(1.0);

    (0.7 * evenness + 0.3 * kendra).clamp(0.0, 1.0)
}

/// Sign count from `from` to `to`, 1 = same sign.
fn sign_distance(from: f64, to: f64) -> u8 {
    let a = dhruv_vedic_base::rashi_index_of(from);
    let b = dhruv_vedic_base::rashi_index_of(to);
    (b + 12 - a) % 12 + 1
}

fn detect_yogas(chart: &ChartPositions, rules: &YogaRules) -> Vec<Yoga> {
    let lon = |g: Graha| chart.body(g).map(|b| b.longitude);
    let same_sign = |a: Graha, b: Graha| match (lon(a), lon(b)) {
        (Some(x), Some(y)) => sign_distance(x, y) == 1,
        _ => false,
    };
    let mut yogas = Vec::new();

    if let (Some(moon), Some(jupiter)) = (lon(Graha::Chandra), lon(Graha::Guru)) {
        if is_kendra(sign_distance(moon, jupiter)) {
            yogas.push(Yoga::Gajakesari);
        }
    }
    if same_sign(Graha::Surya, Graha::Buddh) {
        yogas.push(Yoga::Budhaditya);
    }
    if same_sign(Graha::Chandra, Graha::Mangal) {
        yogas.push(Yoga::ChandraMangala);
    }

    for (graha, yoga) in [
        (Graha::Mangal, Yoga::Ruchaka),
        (Graha::Buddh, Yoga::Bhadra),
        (Graha::Guru, Yoga::Hamsa),
        (Graha::Shukra, Yoga::Malavya),
        (Graha::Shani, Yoga::Sasa),
    ] {
        if let Some(body) = chart.body(graha) {
            let dignified = matches!(
                dignity(graha, body.longitude),
                Dignity::Exalted | Dignity::OwnSign
            );
            if dignified && is_kendra(body.house) {
                yogas.push(yoga);
            }
        }
    }

    if let Some(moon) = lon(Graha::Chandra) {
        let benefics = [Graha::Guru, Graha::Shukra, Graha::Buddh]
            .into_iter()
            .filter_map(lon)
            .filter(|&l| matches!(sign_distance(moon, l), 6..=8))
            .count();
        if benefics >= rules.adhi_min_benefics {
            yogas.push(Yoga::Adhi);
        }
    }

    yogas
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::chart_with;

    const EPS: f64 = 1e-9;

    fn evaluate(chart: &ChartPositions) -> HarmonyAnalysis {
        ChartHarmonyEvaluator::default().evaluate(chart).unwrap()
    }

    #[test]
    fn exact_conjunction_is_fully_harmonious() {
        let a = evaluate(&chart_with(&[(Graha::Surya, 100.0), (Graha::Guru, 100.0)]));
        assert_eq!(a.aspects.len(), 1);
        assert_eq!(a.aspects[0].kind, AspectKind::Conjunction);
        assert!((a.aspect_harmony - 1.0).abs() < EPS);
    }

    #[test]
    fn exact_opposition_lowers_harmony() {
        let a = evaluate(&chart_with(&[(Graha::Surya, 10.0), (Graha::Shani, 190.0)]));
        assert!((a.aspect_harmony - 0.1).abs() < EPS, "{}", a.aspect_harmony);
    }

    #[test]
    fn no_aspects_is_neutral() {
        let a = evaluate(&chart_with(&[(Graha::Surya, 10.0), (Graha::Shani, 50.0)]));
        assert!(a.aspects.is_empty());
        assert_eq!(a.aspect_harmony, 0.5);
    }

    #[test]
    fn nodes_never_aspect_each_other() {
        let a = evaluate(&chart_with(&[(Graha::Rahu, 10.0), (Graha::Ketu, 190.0)]));
        assert!(a.aspects.is_empty());
    }

    #[test]
    fn detects_classical_yogas() {
        // Moon in Mesha, Jupiter in Karka (4th from Moon, own-exalted, 4th house).
        let chart = chart_with(&[
            (Graha::Chandra, 10.0),
            (Graha::Guru, 95.0),
            (Graha::Surya, 200.0),
            (Graha::Buddh, 205.0),
            (Graha::Mangal, 15.0),
        ]);
        let a = evaluate(&chart);
        for y in [Yoga::Gajakesari, Yoga::Budhaditya, Yoga::ChandraMangala, Yoga::Hamsa] {
            assert!(a.yogas.contains(&y), "{y:?} missing from {:?}", a.yogas);
        }
        assert!((a.yoga_strength - 1.0).abs() < EPS);
    }

    #[test]
    fn adhi_needs_two_benefics() {
        let one = evaluate(&chart_with(&[(Graha::Chandra, 10.0), (Graha::Shukra, 190.0)]));
        assert!(!one.yogas.contains(&Yoga::Adhi));
        let two = evaluate(&chart_with(&[
            (Graha::Chandra, 10.0),
            (Graha::Shukra, 190.0),
            (Graha::Buddh, 215.0),
        ]));
        assert!(two.yogas.contains(&Yoga::Adhi));
    }

    #[test]
    fn spread_chart_balances_better_than_stacked() {
        let spread = chart_with(&[
            (Graha::Surya, 5.0),
            (Graha::Chandra, 95.0),
            (Graha::Mangal, 185.0),
            (Graha::Buddh, 275.0),
        ]);
        let stacked = chart_with(&[
            (Graha::Surya, 35.0),
            (Graha::Chandra, 36.0),
            (Graha::Mangal, 37.0),
            (Graha::Buddh, 38.0),
        ]);
        assert!((house_balance(&spread) - 1.0).abs() < EPS);
        assert!(house_balance(&stacked) < 0.1);
    }

    #[test]
    fn score_in_unit_range() {
        let a = evaluate(&chart_with(&[
            (Graha::Surya, 280.0),
            (Graha::Chandra, 45.0),
            (Graha::Mangal, 120.0),
            (Graha::Shani, 40.0),
        ]));
        assert!((0.0..=1.0).contains(&a.score));
        assert_eq!(a.sub_components().len(), 3);
    }
}
