//! Sidereal time from UT Julian Dates.
//!
//! GMST is the Earth Rotation Angle (IERS Conventions 2010, Eq. 5.15) plus
//! the Capitaine et al. 2003 polynomial. UT1 − UTC is ignored; at the
//! sub-second level it moves the ascendant by well under an arc-second.

use crate::julian::{DAYS_PER_CENTURY, J2000_JD};

const ARCSEC_PER_DEG: f64 = 3600.0;

/// Earth Rotation Angle in degrees, [0, 360).
pub fn earth_rotation_angle_deg(jd_ut: f64) -> f64 {
    let du = jd_ut - J2000_JD;
    let turns = 0.779_057_273_264_0 + 1.002_737_811_911_354_6 * du;
    (turns.rem_euclid(1.0)) * 360.0
}

/// Greenwich Mean Sidereal Time in degrees, [0, 360).
pub fn gmst_deg(jd_ut: f64) -> f64 {
    let t = (jd_ut - J2000_JD) / DAYS_PER_CENTURY;
    let poly_arcsec = 0.014506
        + t * (4612.156534 + t * (1.3915817 + t * (-0.00000044 + t * (-0.000029956 - t * 0.0000000368))));
    (earth_rotation_angle_deg(jd_ut) + poly_arcsec / ARCSEC_PER_DEG).rem_euclid(360.0)
}

/// Local sidereal time in degrees for an east-positive longitude.
pub fn local_sidereal_time_deg(jd_ut: f64, east_longitude_deg: f64) -> f64 {
    (gmst_deg(jd_ut) + east_longitude_deg).rem_euclid(360.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn era_at_j2000_noon() {
        let theta = earth_rotation_angle_deg(J2000_JD);
        assert!((theta - 280.46).abs() < 0.1, "ERA = {theta}");
    }

    #[test]
    fn gmst_j2000_midnight() {
        // 2000-Jan-01 0h UT: GMST = 6h 39m 51.17s ≈ 99.963°
        let g = gmst_deg(2_451_544.5);
        assert!((g - 99.963).abs() < 0.01, "GMST = {g}");
    }

    #[test]
    fn gmst_gains_about_a_degree_per_day() {
        let g1 = gmst_deg(2_460_000.5);
        let g2 = gmst_deg(2_460_001.5);
        let gain = (g2 - g1).rem_euclid(360.0);
        assert!((gain - 0.9856).abs() < 0.001, "gain = {gain}");
    }

    #[test]
    fn lst_adds_east_longitude() {
        let jd = 2_455_000.25;
        let lst = local_sidereal_time_deg(jd, 77.2);
        let expected = (gmst_deg(jd) + 77.2).rem_euclid(360.0);
        assert!((lst - expected).abs() < 1e-12);
    }

    #[test]
    fn lst_west_longitude_wraps() {
        let lst = local_sidereal_time_deg(2_451_544.5, -120.0);
        assert!((0.0..360.0).contains(&lst), "lst = {lst}");
    }
}
