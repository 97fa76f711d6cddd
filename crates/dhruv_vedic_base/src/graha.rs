//! Vedic planet (graha) enum and rashi lordship.
//!
//! The 9 grahas are the bodies every chart factor is scored over. Seven map
//! onto ephemeris bodies; Rahu and Ketu are the lunar nodes.

use dhruv_core::Body;
use serde::{Deserialize, Serialize};

use crate::rashi::{ALL_RASHIS, Rashi};

/// The 9 Vedic grahas. Serialized by lowercase English name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Graha {
    #[serde(rename = "sun")]
    Surya,
    #[serde(rename = "moon")]
    Chandra,
    #[serde(rename = "mars")]
    Mangal,
    #[serde(rename = "mercury")]
    Buddh,
    #[serde(rename = "jupiter")]
    Guru,
    #[serde(rename = "venus")]
    Shukra,
    #[serde(rename = "saturn")]
    Shani,
    #[serde(rename = "rahu")]
    Rahu,
    #[serde(rename = "ketu")]
    Ketu,
}

/// All 9 grahas in traditional order.
pub const ALL_GRAHAS: [Graha; 9] = [
    Graha::Surya,
    Graha::Chandra,
    Graha::Mangal,
    Graha::Buddh,
    Graha::Guru,
    Graha::Shukra,
    Graha::Shani,
    Graha::Rahu,
    Graha::Ketu,
];

/// The 7 classical grahas (sapta grahas), excluding Rahu and Ketu.
pub const SAPTA_GRAHAS: [Graha; 7] = [
    Graha::Surya,
    Graha::Chandra,
    Graha::Mangal,
    Graha::Buddh,
    Graha::Guru,
    Graha::Shukra,
    Graha::Shani,
];

impl Graha {
    /// Sanskrit name of the graha.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Surya => "Surya",
            Self::Chandra => "Chandra",
            Self::Mangal => "Mangal",
            Self::Buddh => "Buddh",
            Self::Guru => "Guru",
            Self::Shukra => "Shukra",
            Self::Shani => "Shani",
            Self::Rahu => "Rahu",
            Self::Ketu => "Ketu",
        }
    }

    /// English name of the graha.
    pub const fn english_name(self) -> &'static str {
        match self {
            Self::Surya => "Sun",
            Self::Chandra => "Moon",
            Self::Mangal => "Mars",
            Self::Buddh => "Mercury",
            Self::Guru => "Jupiter",
            Self::Shukra => "Venus",
            Self::Shani => "Saturn",
            Self::Rahu => "Rahu",
            Self::Ketu => "Ketu",
        }
    }

    /// 0-based index into ALL_GRAHAS.
    pub const fn index(self) -> u8 {
        match self {
            Self::Surya => 0,
            Self::Chandra => 1,
            Self::Mangal => 2,
            Self::Buddh => 3,
            Self::Guru => 4,
            Self::Shukra => 5,
            Self::Shani => 6,
            Self::Rahu => 7,
            Self::Ketu => 8,
        }
    }

    /// Ephemeris body for the graha. None for the nodes.
    pub const fn body(self) -> Option<Body> {
        match self {
            Self::Surya => Some(Body::Sun),
            Self::Chandra => Some(Body::Moon),
            Self::Mangal => Some(Body::Mars),
            Self::Buddh => Some(Body::Mercury),
            Self::Guru => Some(Body::Jupiter),
            Self::Shukra => Some(Body::Venus),
            Self::Shani => Some(Body::Saturn),
            Self::Rahu | Self::Ketu => None,
        }
    }

    pub const fn is_node(self) -> bool {
        matches!(self, Self::Rahu | Self::Ketu)
    }

    /// Parse an English or Sanskrit name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.trim().to_ascii_lowercase();
        ALL_GRAHAS.into_iter().find(|g| {
            g.english_name().eq_ignore_ascii_case(&lower) || g.name().eq_ignore_ascii_case(&lower)
        })
    }
}

/// Get the planetary lord of a rashi.
///
/// Mesha/Vrischika → Mangal, Vrishabha/Tula → Shukra, Mithuna/Kanya → Buddh,
/// Karka → Chandra, Simha → Surya, Dhanu/Meena → Guru, Makara/Kumbha → Shani.
pub const fn rashi_lord(rashi: Rashi) -> Graha {
    match rashi {
        Rashi::Mesha | Rashi::Vrischika => Graha::Mangal,
        Rashi::Vrishabha | Rashi::Tula => Graha::Shukra,
        Rashi::Mithuna | Rashi::Kanya => Graha::Buddh,
        Rashi::Karka => Graha::Chandra,
        Rashi::Simha => Graha::Surya,
        Rashi::Dhanu | Rashi::Meena => Graha::Guru,
        Rashi::Makara | Rashi::Kumbha => Graha::Shani,
    }
}

/// Get the lord of a rashi by 0-based index. None if index >= 12.
pub fn rashi_lord_by_index(rashi_index: u8) -> Option<Graha> {
    ALL_RASHIS.get(rashi_index as usize).map(|&r| rashi_lord(r))
}
