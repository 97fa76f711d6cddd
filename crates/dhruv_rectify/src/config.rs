//! Rectification configuration.
//!
//! Every key is optional in the TOML file; absent keys take the defaults
//! below. [`load`] reads, parses and validates in one step.
//!
//! ```toml
//! [search]
//! radius_minutes = 30.0
//! step_minutes = 1.5
//! max_passes = 3
//!
//! [weights]
//! elemental = 0.3
//! events = 0.3
//! strength = 0.2
//! harmony = 0.2
//!
//! [chart]
//! ayanamsha = "lahiri"
//! house_system = "whole_sign"
//! ```

use std::fs;
use std::path::Path;

use dhruv_vedic_base::{AyanamshaSystem, HouseSystem, NodeMode};
use serde::{Deserialize, Serialize};

use crate::error::{RectifyError, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RectifyConfig {
    pub search: SearchConfig,
    pub weights: ComponentWeights,
    pub elemental: ElementalWeights,
    pub strength: StrengthWeights,
    pub harmony: HarmonyWeights,
    pub events: EventWeights,
    pub chart: ChartConfig,
}

/// Coarse-to-fine search window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Width of the first window, minutes (probes span ±radius/2).
    pub radius_minutes: f64,
    /// Probe spacing of the first pass, minutes.
    pub step_minutes: f64,
    pub max_passes: u32,
    /// Early stop when a pass improves the best confidence by less than this.
    pub precision_threshold: f64,
    /// Bound on |rectified − original|, minutes.
    pub max_adjustment_minutes: f64,
    /// Evaluate probes of a pass on the rayon pool.
    pub parallel: bool,
    /// Memoize candidates by probe time within one invocation.
    pub cache: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            radius_minutes: 30.0,
            step_minutes: 1.5,
            max_passes: 3,
            precision_threshold: 0.001,
            max_adjustment_minutes: 30.0,
            parallel: true,
            cache: true,
        }
    }
}

/// Top-level confidence weights. Renormalized over applicable components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentWeights {
    pub elemental: f64,
    pub events: f64,
    pub strength: f64,
    pub harmony: f64,
}

impl Default for ComponentWeights {
    fn default() -> Self {
        Self {
            elemental: 0.30,
            events: 0.30,
            strength: 0.20,
            harmony: 0.20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementalWeights {
    pub distribution: f64,
    pub quality: f64,
    pub harmony: f64,
    /// Multiplier for the element ruling the time-of-day tattwa.
    pub time_of_day_boost: f64,
    /// Multiplier for the element of the Sun's sign.
    pub solar_month_boost: f64,
    /// Relative modifier when a body sits in a friendly element.
    pub friend_modifier: f64,
    pub enemy_modifier: f64,
    pub neutral_modifier: f64,
}

impl Default for ElementalWeights {
    fn default() -> Self {
        Self {
            distribution: 0.4,
            quality: 0.3,
            harmony: 0.3,
            time_of_day_boost: 1.2,
            solar_month_boost: 1.1,
            friend_modifier: 0.20,
            enemy_modifier: -0.18,
            neutral_modifier: 0.05,
        }
    }
}

/// Six-part planetary strength weighting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrengthWeights {
    pub positional: f64,
    pub directional: f64,
    pub temporal: f64,
    pub motional: f64,
    pub natural: f64,
    pub aspectual: f64,
}

impl Default for StrengthWeights {
    fn default() -> Self {
        Self {
            positional: 0.25,
            directional: 0.20,
            temporal: 0.20,
            motional: 0.15,
            natural: 0.10,
            aspectual: 0.10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarmonyWeights {
    pub aspects: f64,
    pub houses: f64,
    pub yogas: f64,
}

impl Default for HarmonyWeights {
    fn default() -> Self {
        Self {
            aspects: 1.0,
            houses: 1.0,
            yogas: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventWeights {
    /// Share of the active dasha lords in a per-event score.
    pub dasha: f64,
    /// Share of the relevant divisional chart.
    pub varga: f64,
    /// Share of the ascendant's KP sub lord.
    pub sub_lord: f64,
    pub major: f64,
    pub sub: f64,
    pub sub_sub: f64,
}

impl Default for EventWeights {
    fn default() -> Self {
        Self {
            dasha: 0.50,
            varga: 0.35,
            sub_lord: 0.15,
            major: 0.3,
            sub: 0.4,
            sub_sub: 0.3,
        }
    }
}

/// Settings of the built-in position provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub ayanamsha: AyanamshaSystem,
    pub house_system: HouseSystem,
    pub node_mode: NodeMode,
}

/// Read, parse and validate a TOML config file.
pub fn load(path: &Path) -> Result<RectifyConfig> {
    let raw = fs::read_to_string(path).map_err(|source| RectifyError::ReadConfig {
        path: path.to_path_buf(),
        source,
    })?;
    let cfg: RectifyConfig = toml::from_str(&raw).map_err(|source| RectifyError::ParseConfig {
        path: path.to_path_buf(),
        source,
    })?;

    validate(&cfg)?;

    Ok(cfg)
}

fn check_weight(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(RectifyError::config(format!(
            "{name} must be a finite number, zero or greater."
        )));
    }
    Ok(())
}

fn check_positive(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(RectifyError::config(format!(
            "{name} must be a finite number greater than zero."
        )));
    }
    Ok(())
}

pub fn validate(cfg: &RectifyConfig) -> Result<()> {
    let s = &cfg.search;
    check_positive("search.radius_minutes", s.radius_minutes)?;
    check_positive("search.step_minutes", s.step_minutes)?;
    check_positive("search.max_adjustment_minutes", s.max_adjustment_minutes)?;
    check_weight("search.precision_threshold", s.precision_threshold)?;
    if s.max_passes == 0 {
        return Err(RectifyError::config(
            "search.max_passes must be greater than zero.",
        ));
    }
    if s.step_minutes > s.radius_minutes {
        return Err(RectifyError::config(
            "search.step_minutes must not exceed search.radius_minutes.",
        ));
    }
    // 1 ms probe resolution, bounded probe count per pass.
    if s.radius_minutes / s.step_minutes > 10_000.0 {
        return Err(RectifyError::config(
            "search.radius_minutes / search.step_minutes must be at most 10000.",
        ));
    }

    let w = &cfg.weights;
    for (name, v) in [
        ("weights.elemental", w.elemental),
        ("weights.events", w.events),
        ("weights.strength", w.strength),
        ("weights.harmony", w.harmony),
    ] {
        check_weight(name, v)?;
    }

    let e = &cfg.elemental;
    for (name, v) in [
        ("elemental.distribution", e.distribution),
        ("elemental.quality", e.quality),
        ("elemental.harmony", e.harmony),
    ] {
        check_weight(name, v)?;
    }
    check_positive("elemental.time_of_day_boost", e.time_of_day_boost)?;
    check_positive("elemental.solar_month_boost", e.solar_month_boost)?;
    for (name, v) in [
        ("elemental.friend_modifier", e.friend_modifier),
        ("elemental.enemy_modifier", e.enemy_modifier),
        ("elemental.neutral_modifier", e.neutral_modifier),
    ] {
        if !v.is_finite() || v <= -1.0 {
            return Err(RectifyError::config(format!(
                "{name} must be a finite number greater than -1."
            )));
        }
    }

    let st = &cfg.strength;
    for (name, v) in [
        ("strength.positional", st.positional),
        ("strength.directional", st.directional),
        ("strength.temporal", st.temporal),
        ("strength.motional", st.motional),
        ("strength.natural", st.natural),
        ("strength.aspectual", st.aspectual),
    ] {
        check_weight(name, v)?;
    }
    if st.positional + st.directional + st.temporal + st.motional + st.natural + st.aspectual
        <= 0.0
    {
        return Err(RectifyError::config(
            "strength weights must not all be zero.",
        ));
    }

    let h = &cfg.harmony;
    for (name, v) in [
        ("harmony.aspects", h.aspects),
        ("harmony.houses", h.houses),
        ("harmony.yogas", h.yogas),
    ] {
        check_weight(name, v)?;
    }

    let ev = &cfg.events;
    for (name, v) in [
        ("events.dasha", ev.dasha),
        ("events.varga", ev.varga),
        ("events.sub_lord", ev.sub_lord),
        ("events.major", ev.major),
        ("events.sub", ev.sub),
        ("events.sub_sub", ev.sub_sub),
    ] {
        check_weight(name, v)?;
    }

    Ok(())
}
