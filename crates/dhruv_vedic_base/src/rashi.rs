//! Rashi (zodiac sign) classification.
//!
//! The ecliptic is divided into 12 signs of 30 degrees each, starting from
//! Mesha at 0 degrees sidereal. Each sign carries an element (fire, earth,
//! air, water cycling from Mesha) and a modality (movable, fixed, dual
//! cycling from Mesha).

use serde::{Deserialize, Serialize};

use crate::util::normalize_360;

/// The 12 rashis starting from Mesha (Aries).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rashi {
    Mesha,
    Vrishabha,
    Mithuna,
    Karka,
    Simha,
    Kanya,
    Tula,
    Vrischika,
    Dhanu,
    Makara,
    Kumbha,
    Meena,
}

/// All 12 rashis in order (0 = Mesha, 11 = Meena).
pub const ALL_RASHIS: [Rashi; 12] = [
    Rashi::Mesha,
    Rashi::Vrishabha,
    Rashi::Mithuna,
    Rashi::Karka,
    Rashi::Simha,
    Rashi::Kanya,
    Rashi::Tula,
    Rashi::Vrischika,
    Rashi::Dhanu,
    Rashi::Makara,
    Rashi::Kumbha,
    Rashi::Meena,
];

/// Element of a sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RashiElement {
    Fire,
    Earth,
    Air,
    Water,
}

/// Modality of a sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignType {
    /// Movable (cardinal): Mesha, Karka, Tula, Makara.
    Chara,
    /// Fixed: Vrishabha, Simha, Vrischika, Kumbha.
    Sthira,
    /// Dual (mutable): Mithuna, Kanya, Dhanu, Meena.
    Dvisvabhava,
}

impl Rashi {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Mesha => "Mesha",
            Self::Vrishabha => "Vrishabha",
            Self::Mithuna => "Mithuna",
            Self::Karka => "Karka",
            Self::Simha => "Simha",
            Self::Kanya => "Kanya",
            Self::Tula => "Tula",
            Self::Vrischika => "Vrischika",
            Self::Dhanu => "Dhanu",
            Self::Makara => "Makara",
            Self::Kumbha => "Kumbha",
            Self::Meena => "Meena",
        }
    }

    pub const fn western_name(self) -> &'static str {
        match self {
            Self::Mesha => "Aries",
            Self::Vrishabha => "Taurus",
            Self::Mithuna => "Gemini",
            Self::Karka => "Cancer",
            Self::Simha => "Leo",
            Self::Kanya => "Virgo",
            Self::Tula => "Libra",
            Self::Vrischika => "Scorpio",
            Self::Dhanu => "Sagittarius",
            Self::Makara => "Capricorn",
            Self::Kumbha => "Aquarius",
            Self::Meena => "Pisces",
        }
    }

    /// 0-based index (Mesha=0 .. Meena=11).
    pub const fn index(self) -> u8 {
        self as u8
    }

    pub const fn element(self) -> RashiElement {
        rashi_element(self.index())
    }

    pub const fn sign_type(self) -> SignType {
        sign_type(self.index())
    }
}

/// Element of a rashi by 0-based index.
pub const fn rashi_element(rashi_index: u8) -> RashiElement {
    match rashi_index % 4 {
        0 => RashiElement::Fire,
        1 => RashiElement::Earth,
        2 => RashiElement::Air,
        _ => RashiElement::Water,
    }
}

/// Modality of a rashi by 0-based index.
pub const fn sign_type(rashi_index: u8) -> SignType {
    match rashi_index % 3 {
        0 => SignType::Chara,
        1 => SignType::Sthira,
        _ => SignType::Dvisvabhava,
    }
}

/// Position of a longitude within its rashi.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RashiInfo {
    pub rashi: Rashi,
    pub rashi_index: u8,
    /// Decimal degrees within the rashi [0.0, 30.0).
    pub degrees_in_rashi: f64,
}

/// Determine rashi from sidereal ecliptic longitude.
pub fn rashi_from_longitude(sidereal_lon_deg: f64) -> RashiInfo {
    let lon = normalize_360(sidereal_lon_deg);
    let rashi_idx = ((lon / 30.0).floor() as u8).min(11);
    RashiInfo {
        rashi: ALL_RASHIS[rashi_idx as usize],
        rashi_index: rashi_idx,
        degrees_in_rashi: lon - rashi_idx as f64 * 30.0,
    }
}
