//! Aggregation of the four analyzer outputs into one confidence.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::ComponentWeights;
use crate::elemental::ElementalAnalysis;
use crate::events::EventAnalysis;
use crate::harmony::HarmonyAnalysis;
use crate::strength::StrengthAnalysis;

/// Components below this score get a suggestion.
const SUGGEST_BELOW: f64 = 0.7;
/// Components below this score get a high-priority suggestion.
const HIGH_PRIORITY_BELOW: f64 = 0.5;
/// Overall confidence reported when every weight is zero.
const FALLBACK_CONFIDENCE: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentScore {
    pub score: f64,
    /// Normalized weight; weights of included components sum to 1.
    pub weight: f64,
    pub sub_components: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    pub component: String,
    pub priority: Priority,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfidenceBreakdown {
    pub overall: f64,
    pub components: BTreeMap<String, ComponentScore>,
    /// Highest sub-component, as `component.sub`.
    pub strongest_area: Option<String>,
    /// Lowest sub-component, as `component.sub`.
    pub weakest_area: Option<String>,
    /// Population variance of the component scores.
    pub balance_variance: f64,
    /// Weakest component first.
    pub suggestions: Vec<Suggestion>,
    /// Set when all weights were zero and `overall` is the neutral fallback.
    pub fallback: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ConfidenceAggregator {
    weights: ComponentWeights,
}

impl ConfidenceAggregator {
    pub fn new(weights: ComponentWeights) -> Self {
        Self { weights }
    }

    /// Events, when `None`, are excluded and the other weights renormalized.
    pub fn aggregate(
        &self,
        elemental: &ElementalAnalysis,
        strength: &StrengthAnalysis,
        harmony: &HarmonyAnalysis,
        events: Option<&EventAnalysis>,
    ) -> ConfidenceBreakdown {
        let w = &self.weights;
        let mut raw: Vec<(&str, f64, f64, BTreeMap<String, f64>)> = vec![
            ("elemental", elemental.score, w.elemental, elemental.sub_components()),
            ("strength", strength.score, w.strength, strength.sub_components.clone()),
            ("harmony", harmony.score, w.harmony, harmony.sub_components()),
        ];
        if let Some(events) = events {
            raw.push(("events", events.score, w.events, events.sub_components()));
        }

        let total_weight: f64 = raw.iter().map(|(_, _, weight, _)| weight).sum();
        let fallback = total_weight <= 0.0 || !total_weight.is_finite();

        let components: BTreeMap<String, ComponentScore> = raw
            .into_iter()
            .map(|(name, score, weight, sub_components)| {
                let weight = if fallback { 0.0 } else { weight / total_weight };
                (
                    name.to_string(),
                    ComponentScore {
                        score: score.clamp(0.0, 1.0),
                        weight,
                        sub_components,
                    },
                )
            })
            .collect();

        let overall = if fallback {
            FALLBACK_CONFIDENCE
        } else {
            components
                .values()
                .map(|c| c.score * c.weight)
                .sum::<f64>()
                .clamp(0.0, 1.0)
        };

        let (strongest_area, weakest_area) = extreme_areas(&components);
        ConfidenceBreakdown {
            overall,
            balance_variance: variance(components.values().map(|c| c.score)),
            suggestions: suggestions(&components),
            strongest_area,
            weakest_area,
            components,
            fallback,
        }
    }
}

fn extreme_areas(components: &BTreeMap<String, ComponentScore>) -> (Option<String>, Option<String>) {
    let areas: Vec<(String, f64)> = components
        .iter()
        .flat_map(|(name, c)| {
            c.sub_components
                .iter()
                .map(move |(sub, v)| (format!("{name}.{sub}"), *v))
        })
        .collect();
    let strongest = areas
        .iter()
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(n, _)| n.clone());
    let weakest = areas
        .iter()
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(n, _)| n.clone());
    (strongest, weakest)
}

fn variance(scores: impl Iterator<Item = f64> + Clone) -> f64 {
    let n = scores.clone().count();
    if n == 0 {
        return 0.0;
    }
    let mean = scores.clone().sum::<f64>() / n as f64;
    scores.map(|s| (s - mean).powi(2)).sum::<f64>() / n as f64
}

fn suggestions(components: &BTreeMap<String, ComponentScore>) -> Vec<Suggestion> {
    let mut weak: Vec<(&String, &ComponentScore)> = components
        .iter()
        .filter(|(_, c)| c.score < SUGGEST_BELOW)
        .collect();
    weak.sort_by(|a, b| a.1.score.total_cmp(&b.1.score).then_with(|| a.0.cmp(b.0)));

    weak.into_iter()
        .map(|(name, c)| Suggestion {
            component: name.clone(),
            priority: if c.score < HIGH_PRIORITY_BELOW {
                Priority::High
            } else {
                Priority::Medium
            },
            message: advice(name).to_string(),
        })
        .collect()
}

fn advice(component: &str) -> &'static str {
    match component {
        "elemental" => "element balance is uneven; check the birth time against the rising sign",
        "strength" => "planetary strengths are weak at this time; consider a wider search radius",
        "harmony" => "chart harmony is low; verify the birth location and time zone",
        "events" => "life events correlate poorly; add more dated events with accurate dates",
        _ => "component scored low",
    }
}
