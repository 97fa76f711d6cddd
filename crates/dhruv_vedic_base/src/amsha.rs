//! Amsha (divisional chart / varga) longitudes.
//!
//! Each amsha divides the 30° rashi span into N equal parts and maps each
//! part onto a target rashi; the position within the part is stretched back
//! to 0–30° inside that target. Sequences follow the Parashari scheme.

use serde::{Deserialize, Serialize};

use crate::rashi::{RashiElement, rashi_element};
use crate::util::normalize_360;

/// Supported divisional charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Amsha {
    D1,
    D2,
    D3,
    D4,
    D6,
    D7,
    D9,
    D10,
    D12,
    D16,
    D20,
    D24,
    D30,
    D60,
}

pub const ALL_AMSHAS: [Amsha; 14] = [
    Amsha::D1,
    Amsha::D2,
    Amsha::D3,
    Amsha::D4,
    Amsha::D6,
    Amsha::D7,
    Amsha::D9,
    Amsha::D10,
    Amsha::D12,
    Amsha::D16,
    Amsha::D20,
    Amsha::D24,
    Amsha::D30,
    Amsha::D60,
];

impl Amsha {
    /// Number of divisions per rashi.
    pub const fn divisions(self) -> u16 {
        match self {
            Self::D1 => 1,
            Self::D2 => 2,
            Self::D3 => 3,
            Self::D4 => 4,
            Self::D6 => 6,
            Self::D7 => 7,
            Self::D9 => 9,
            Self::D10 => 10,
            Self::D12 => 12,
            Self::D16 => 16,
            Self::D20 => 20,
            Self::D24 => 24,
            Self::D30 => 30,
            Self::D60 => 60,
        }
    }

    /// Traditional name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::D1 => "Rashi",
            Self::D2 => "Hora",
            Self::D3 => "Drekkana",
            Self::D4 => "Chaturthamsha",
            Self::D6 => "Shashthamsha",
            Self::D7 => "Saptamsha",
            Self::D9 => "Navamsha",
            Self::D10 => "Dashamsha",
            Self::D12 => "Dwadashamsha",
            Self::D16 => "Shodashamsha",
            Self::D20 => "Vimshamsha",
            Self::D24 => "Chaturvimshamsha",
            Self::D30 => "Trimshamsha",
            Self::D60 => "Shashtiamsha",
        }
    }

    /// Look up by division count (e.g. 9 → D9).
    pub fn from_divisions(n: u16) -> Option<Self> {
        ALL_AMSHAS.into_iter().find(|a| a.divisions() == n)
    }
}

/// Target rashi for division `div_idx` of natal rashi `natal_rashi_idx`.
fn amsha_target_rashi(amsha: Amsha, natal_rashi_idx: u8, div_idx: u16) -> u8 {
    // 0-indexed: 0, 2, 4 .. are the odd (masculine) signs.
    let is_odd = natal_rashi_idx % 2 == 0;
    let natal = natal_rashi_idx as u16;
    let cycle = |start: u16| ((start + div_idx) % 12) as u8;

    match amsha {
        Amsha::D1 => natal_rashi_idx,

        // Hora: odd signs Leo then Cancer, even signs Cancer then Leo.
        Amsha::D2 => match (is_odd, div_idx) {
            (true, 0) | (false, 1) => 4,
            _ => 3,
        },

        // Drekkana: trine progression.
        Amsha::D3 => ((natal + div_idx * 4) % 12) as u8,

        // Odd rashi from itself, even rashi from an offset sign.
        Amsha::D7 => cycle(if is_odd { natal } else { natal + 6 }),
        Amsha::D10 => cycle(if is_odd { natal } else { natal + 8 }),
        Amsha::D24 => cycle(if is_odd { 4 } else { 3 }),

        // Element-based starting rashi.
        Amsha::D9 | Amsha::D60 => cycle(match rashi_element(natal_rashi_idx) {
            RashiElement::Fire => 0,
            RashiElement::Earth => 9,
            RashiElement::Air => 6,
            RashiElement::Water => 3,
        }),
        Amsha::D16 => cycle(match rashi_element(natal_rashi_idx) {
            RashiElement::Fire | RashiElement::Water => 0,
            RashiElement::Earth => 4,
            RashiElement::Air => 8,
        }),
        Amsha::D20 => cycle(match rashi_element(natal_rashi_idx) {
            RashiElement::Fire | RashiElement::Water => 0,
            RashiElement::Earth => 8,
            RashiElement::Air => 4,
        }),

        Amsha::D30 => cycle(if is_odd { 0 } else { 11 }),

        // From the natal rashi, step +1.
        Amsha::D4 | Amsha::D6 | Amsha::D12 => cycle(natal),
    }
}

/// Transform a sidereal longitude through an amsha division.
///
/// Returns the amsha longitude in [0, 360).
pub fn amsha_longitude(sidereal_lon: f64, amsha: Amsha) -> f64 {
    let lon = normalize_360(sidereal_lon);
    if amsha == Amsha::D1 {
        return lon;
    }

    let rashi_idx = (lon / 30.0).floor().min(11.0) as u8;
    let pos_in_rashi = lon - rashi_idx as f64 * 30.0;
    let total_divisions = amsha.divisions();
    let deg_per_div = 30.0 / total_divisions as f64;
    let div_idx = ((pos_in_rashi / deg_per_div).floor() as u16).min(total_divisions - 1);

    let target = amsha_target_rashi(amsha, rashi_idx, div_idx);
    let pos_in_div = pos_in_rashi - div_idx as f64 * deg_per_div;
    let scaled = pos_in_div / deg_per_div * 30.0;

    (target as f64 * 30.0 + scaled) % 360.0
}
