//! Five-element (tattwa) balance of a chart.
//!
//! Each graha contributes its strength to its own element, scaled by how
//! that element gets on with the element of the sign it occupies. The
//! time-of-day tattwa and the Sun's sign element then receive their cyclic
//! boosts before the distribution is normalized to sum to 1.

use std::collections::BTreeMap;

use dhruv_vedic_base::{Graha, SignType, rashi_element, sign_type};
use serde::Serialize;

use crate::config::ElementalWeights;
use crate::error::ComputationError;
use crate::rules::{ElementRelation, ElementRules, sign_element};
use crate::strength::StrengthAnalysis;
use crate::types::{ALL_ELEMENTS, ChartPositions, Element, ElementDistribution};

/// Elements favoured by the moment, applied as boosts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CyclicInfluence {
    pub time_of_day: Element,
    pub solar_month: Option<Element>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementalAnalysis {
    pub elements: ElementDistribution,
    /// Closeness of the distribution to an even 0.2 split.
    pub element_balance: f64,
    /// Evenness over cardinal/fixed/mutable signs.
    pub quality_balance: f64,
    /// Agreement between mutually reinforcing elements.
    pub elemental_harmony: f64,
    pub cyclic_influence: CyclicInfluence,
    pub dominant: Element,
    pub score: f64,
}

impl ElementalAnalysis {
    pub fn sub_components(&self) -> BTreeMap<String, f64> {
        BTreeMap::from([
            ("distribution".to_string(), self.element_balance),
            ("quality".to_string(), self.quality_balance),
            ("harmony".to_string(), self.elemental_harmony),
        ])
    }
}

#[derive(Debug, Clone, Default)]
pub struct ElementalBalanceAnalyzer {
    rules: ElementRules,
    weights: ElementalWeights,
}

impl ElementalBalanceAnalyzer {
    pub fn new(rules: ElementRules, weights: ElementalWeights) -> Self {
        Self { rules, weights }
    }

    pub fn analyze(
        &self,
        chart: &ChartPositions,
        strength: &StrengthAnalysis,
    ) -> Result<ElementalAnalysis, ComputationError> {
        let mut raw = [0.0f64; 5];
        let mut quality = [0.0f64; 3];

        for (graha, body) in &chart.bodies {
            let Some(element) = self.rules.element_of(*graha) else {
                continue;
            };
            let weight = strength.total(*graha);
            let rashi = body.rashi_index();
            let occupied = sign_element(rashi_element(rashi));
            raw[element.index()] += weight * (1.0 + self.modifier(element, occupied));

            let bucket = match sign_type(rashi) {
                SignType::Chara => 0,
                SignType::Sthira => 1,
                SignType::Dvisvabhava => 2,
            };
            quality[bucket] += weight;
        }

        let cyclic = self.cyclic_influence(chart);
        raw[cyclic.time_of_day.index()] *= self.weights.time_of_day_boost;
        if let Some(solar) = cyclic.solar_month {
            raw[solar.index()] *= self.weights.solar_month_boost;
        }

        let elements = normalize(raw)
            .map(ElementDistribution::from_array)
            .unwrap_or_else(ElementDistribution::uniform);
        let shares = elements.to_array();
        if shares.iter().any(|v| !v.is_finite()) {
            return Err(ComputationError::NonFinite {
                graha: None,
                quantity: "element distribution",
            });
        }

        let element_balance = evenness(&shares);
        let quality_balance = normalize(quality).map_or(0.5, |q| evenness(&q));
        let elemental_harmony = self.harmony(&elements);

        let w = &self.weights;
        let weight_sum = w.distribution + w.quality + w.harmony;
        let score = if weight_sum > 0.0 {
            (element_balance * w.distribution
                + quality_balance * w.quality
                + elemental_harmony * w.harmony)
                / weight_sum
        } else {
            0.5
        };

        let dominant = ALL_ELEMENTS
            .into_iter()
            .max_by(|a, b| elements.get(*a).total_cmp(&elements.get(*b)))
            .unwrap_or(Element::Ether);

        Ok(ElementalAnalysis {
            elements,
            element_balance,
            quality_balance,
            elemental_harmony,
            cyclic_influence: cyclic,
            dominant,
            score: score.clamp(0.0, 1.0),
        })
    }

    fn modifier(&self, own: Element, occupied: Element) -> f64 {
        match self.rules.relation(own, occupied) {
            ElementRelation::Friend => self.weights.friend_modifier,
            ElementRelation::Enemy => self.weights.enemy_modifier,
            ElementRelation::Neutral => self.weights.neutral_modifier,
        }
    }

    /// Tattwa cycle starting at 06:00 local mean time; Sun's sign element.
    fn cyclic_influence(&self, chart: &ChartPositions) -> CyclicInfluence {
        let minutes = (chart.local_mean_hour() - 6.0).rem_euclid(24.0) * 60.0;
        let slot = (minutes / self.rules.tattwa_minutes).floor() as usize % 5;
        let solar_month = chart
            .body(Graha::Surya)
            .map(|sun| sign_element(rashi_element(sun.rashi_index())));
        CyclicInfluence {
            time_of_day: self.rules.tattwa_cycle[slot],
            solar_month,
        }
    }

    fn harmony(&self, elements: &ElementDistribution) -> f64 {
        let pairs = &self.rules.reinforcing_pairs;
        if pairs.is_empty() {
            return 0.5;
        }
        pairs
            .iter()
            .map(|&(a, b)| 1.0 - (elements.get(a) - elements.get(b)).abs())
            .sum::<f64>()
            / pairs.len() as f64
    }
}

/// Scale to sum 1; `None` when the total is not positive.
fn normalize<const N: usize>(v: [f64; N]) -> Option<[f64; N]> {
    let total: f64 = v.iter().sum();
    (total > 0.0 && total.is_finite()).then(|| v.map(|x| x / total))
}

/// 1 − mean relative deviation from the even share, clamped to [0, 1].
fn evenness(shares: &[f64]) -> f64 {
    let n = shares.len() as f64;
    let even = 1.0 / n;
    let deviation = shares.iter().map(|s| (s - even).abs() / even).sum::<f64>() / n;
    (1.0 - deviation).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strength::PlanetaryStrengthEvaluator;
    use crate::testutil::chart_with;

    fn analyze(chart: &ChartPositions) -> ElementalAnalysis {
        let strength = PlanetaryStrengthEvaluator::default().evaluate(chart).unwrap();
        ElementalBalanceAnalyzer::default()
            .analyze(chart, &strength)
            .unwrap()
    }

    fn full_chart() -> ChartPositions {
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
    fn distribution_sums_to_one() {
        let a = analyze(&full_chart());
        assert!((a.elements.sum() - 1.0).abs() < 1e-4, "{:?}", a.elements);
        for v in a.elements.to_array() {
            assert!((0.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn scores_in_unit_range() {
        let a = analyze(&full_chart());
        for v in [a.element_balance, a.quality_balance, a.elemental_harmony, a.score] {
            assert!((0.0..=1.0).contains(&v), "{a:?}");
        }
    }

    #[test]
    fn evenness_extremes() {
        assert!((evenness(&[0.2; 5]) - 1.0).abs() < 1e-12);
        assert_eq!(evenness(&[1.0, 0.0, 0.0, 0.0, 0.0]), 0.0);
    }

    #[test]
    fn noon_at_greenwich_is_in_the_ether_tattwa() {
        // 360 minutes after 06:00 → slot 15 → 15 % 5 = 0 → ether.
        let a = analyze(&full_chart());
        assert_eq!(a.cyclic_influence.time_of_day, Element::Ether);
        // Sun at 280° sidereal is in Makara, an earth sign.
        assert_eq!(a.cyclic_influence.solar_month, Some(Element::Earth));
    }

    #[test]
    fn empty_chart_falls_back_to_uniform() {
        let a = analyze(&chart_with(&[]));
        assert_eq!(a.elements, ElementDistribution::uniform());
        assert!((a.element_balance - 1.0).abs() < 1e-12);
    }

    #[test]
    fn friendly_sign_raises_share() {
        // Mars in fiery Mesha versus watery Karka.
        let in_fire = analyze(&chart_with(&[(Graha::Mangal, 5.0), (Graha::Chandra, 200.0)]));
        let in_water = analyze(&chart_with(&[(Graha::Mangal, 95.0), (Graha::Chandra, 200.0)]));
        assert!(in_fire.elements.fire > in_water.elements.fire);
    }
}
