//! Nakshatra (lunar mansion) lookup in the 27-fold scheme.
//!
//! Each nakshatra spans 13°20′ starting from Ashwini at 0° sidereal and is
//! divided into four padas of 3°20′.

use serde::Serialize;

use crate::util::normalize_360;

/// Span of one nakshatra in the 27-fold scheme, degrees.
pub const NAKSHATRA_SPAN_27: f64 = 360.0 / 27.0;

/// Span of one pada (quarter nakshatra), degrees.
pub const PADA_SPAN: f64 = NAKSHATRA_SPAN_27 / 4.0;

const NAMES: [&str; 27] = [
    "Ashwini",
    "Bharani",
    "Krittika",
    "Rohini",
    "Mrigashira",
    "Ardra",
    "Punarvasu",
    "Pushya",
    "Ashlesha",
    "Magha",
    "Purva Phalguni",
    "Uttara Phalguni",
    "Hasta",
    "Chitra",
    "Swati",
    "Vishakha",
    "Anuradha",
    "Jyeshtha",
    "Mula",
    "Purva Ashadha",
    "Uttara Ashadha",
    "Shravana",
    "Dhanishta",
    "Shatabhisha",
    "Purva Bhadrapada",
    "Uttara Bhadrapada",
    "Revati",
];

/// Nakshatra position of a sidereal longitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NakshatraInfo {
    /// 0-based index (0 = Ashwini .. 26 = Revati).
    pub index: u8,
    pub name: &'static str,
    /// 1-based pada (1..=4).
    pub pada: u8,
    /// Fraction of the nakshatra already traversed, [0, 1).
    pub elapsed_fraction: f64,
}

/// Determine nakshatra and pada from sidereal longitude.
pub fn nakshatra_from_longitude(sidereal_lon_deg: f64) -> NakshatraInfo {
    let lon = normalize_360(sidereal_lon_deg);
    let index = ((lon / NAKSHATRA_SPAN_27).floor() as u8).min(26);
    let within = lon - index as f64 * NAKSHATRA_SPAN_27;
    let pada = ((within / PADA_SPAN).floor() as u8).min(3) + 1;
    NakshatraInfo {
        index,
        name: NAMES[index as usize],
        pada,
        elapsed_fraction: within / NAKSHATRA_SPAN_27,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ashwini_start() {
        let n = nakshatra_from_longitude(0.0);
        assert_eq!(n.index, 0);
        assert_eq!(n.pada, 1);
        assert_eq!(n.name, "Ashwini");
    }

    #[test]
    fn rohini_at_forty_degrees() {
        let n = nakshatra_from_longitude(40.0);
        assert_eq!(n.index, 3);
        assert!(n.elapsed_fraction.abs() < 1e-9);
    }

    #[test]
    fn revati_last_pada() {
        let n = nakshatra_from_longitude(359.9);
        assert_eq!(n.index, 26);
        assert_eq!(n.pada, 4);
    }
}
