//! Bhava (house) cusps and house membership.
//!
//! Three systems: whole-sign (houses are the signs counted from the lagna
//! sign), equal (30° from the lagna degree) and Porphyry (each quadrant
//! between the angles trisected). Inputs and cusps share one zodiac; pass
//! sidereal lagna/MC for sidereal houses.

use serde::{Deserialize, Serialize};

use crate::util::normalize_360;

/// House division method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HouseSystem {
    #[default]
    WholeSign,
    Equal,
    Porphyry,
}

/// Twelve cusp longitudes, index 0 = first house.
pub fn house_cusps(system: HouseSystem, lagna_deg: f64, mc_deg: f64) -> [f64; 12] {
    match system {
        HouseSystem::WholeSign => {
            let start = (normalize_360(lagna_deg) / 30.0).floor() * 30.0;
            std::array::from_fn(|i| normalize_360(start + 30.0 * i as f64))
        }
        HouseSystem::Equal => std::array::from_fn(|i| normalize_360(lagna_deg + 30.0 * i as f64)),
        HouseSystem::Porphyry => {
            let asc = normalize_360(lagna_deg);
            let ic = normalize_360(mc_deg + 180.0);
            let dsc = normalize_360(asc + 180.0);
            let mc = normalize_360(mc_deg);
            let angles = [asc, ic, dsc, mc];
            let mut cusps = [0.0; 12];
            for q in 0..4 {
                let from = angles[q];
                let arc = normalize_360(angles[(q + 1) % 4] - from);
                for k in 0..3 {
                    cusps[q * 3 + k] = normalize_360(from + arc * k as f64 / 3.0);
                }
            }
            cusps
        }
    }
}

/// 1-based house containing `lon_deg` for the given cusps.
pub fn house_of(lon_deg: f64, cusps: &[f64; 12]) -> u8 {
    let lon = normalize_360(lon_deg);
    for i in 0..12 {
        let start = cusps[i];
        let span = normalize_360(cusps[(i + 1) % 12] - start);
        if normalize_360(lon - start) < span {
            return i as u8 + 1;
        }
    }
    // Degenerate cusps (all equal) put everything in the first house.
    1
}

/// Whether a 1-based house is angular (kendra: 1, 4, 7, 10).
pub const fn is_kendra(house: u8) -> bool {
    matches!(house, 1 | 4 | 7 | 10)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_sign_starts_at_sign_boundary() {
        let c = house_cusps(HouseSystem::WholeSign, 47.3, 0.0);
        assert_eq!(c[0], 30.0);
        assert_eq!(c[11], 0.0);
        assert_eq!(house_of(31.0, &c), 1);
        assert_eq!(house_of(29.9, &c), 12);
    }

    #[test]
    fn equal_houses_from_degree() {
        let c = house_cusps(HouseSystem::Equal, 47.3, 0.0);
        assert!((c[1] - 77.3).abs() < 1e-12);
        assert_eq!(house_of(47.2, &c), 12);
        assert_eq!(house_of(47.4, &c), 1);
    }

    #[test]
    fn porphyry_keeps_angles() {
        let asc = 100.0;
        let mc = 10.0;
        let c = house_cusps(HouseSystem::Porphyry, asc, mc);
        assert!((c[0] - asc).abs() < 1e-12);
        assert!((c[3] - 190.0).abs() < 1e-12);
        assert!((c[6] - 280.0).abs() < 1e-12);
        assert!((c[9] - 10.0).abs() < 1e-12);
        assert!((c[1] - 130.0).abs() < 1e-12);
    }

    #[test]
    fn every_longitude_lands_in_one_house() {
        let c = house_cusps(HouseSystem::Porphyry, 355.0, 265.0);
        for i in 0..720 {
            let h = house_of(i as f64 * 0.5, &c);
            assert!((1..=12).contains(&h));
        }
    }

    #[test]
    fn kendras() {
        assert!(is_kendra(1) && is_kendra(10));
        assert!(!is_kendra(5));
    }
}
