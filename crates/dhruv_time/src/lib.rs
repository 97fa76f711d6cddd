//! Time-scale helpers for chart computation.
//!
//! This crate provides:
//! - Julian Date ↔ calendar conversions and `chrono` instant mapping
//! - Greenwich and local sidereal time
//! - Fixed-offset timezone parsing and local → UTC resolution
//!
//! UT is used throughout; ΔT is applied by the ephemeris layer.

pub mod error;
pub mod julian;
pub mod sidereal;
pub mod zone;

pub use error::TimeError;
pub use julian::{
    DAYS_PER_CENTURY, J2000_JD, SECONDS_PER_DAY, UNIX_EPOCH_JD, calendar_to_jd, jd_to_calendar,
    jd_to_centuries, jd_to_utc, utc_to_jd,
};
pub use sidereal::{earth_rotation_angle_deg, gmst_deg, local_sidereal_time_deg};
pub use zone::{local_to_utc, parse_offset};

/// Approximate ΔT = TT − UT in seconds (Espenak & Meeus polynomials, 1900–2150).
///
/// Outside that span the long-term parabola −20 + 32u² is used.
pub fn delta_t_seconds(jd_ut: f64) -> f64 {
    let (year, month, _) = jd_to_calendar(jd_ut);
    let y = year as f64 + (month as f64 - 0.5) / 12.0;
    match y {
        y if (1900.0..1920.0).contains(&y) => {
            let t = y - 1900.0;
            -2.79 + t * (1.494119 + t * (-0.0598939 + t * (0.0061966 - t * 0.000197)))
        }
        y if (1920.0..1941.0).contains(&y) => {
            let t = y - 1920.0;
            21.20 + t * (0.84493 + t * (-0.076100 + t * 0.0020936))
        }
        y if (1941.0..1961.0).contains(&y) => {
            let t = y - 1950.0;
            29.07 + t * (0.407 + t * (-1.0 / 233.0 + t / 2547.0))
        }
        y if (1961.0..1986.0).contains(&y) => {
            let t = y - 1975.0;
            45.45 + t * (1.067 + t * (-1.0 / 260.0 - t / 718.0))
        }
        y if (1986.0..2005.0).contains(&y) => {
            let t = y - 2000.0;
            63.86
                + t * (0.3345
                    + t * (-0.060374 + t * (0.0017275 + t * (0.000651814 + t * 0.00002373599))))
        }
        y if (2005.0..2050.0).contains(&y) => {
            let t = y - 2000.0;
            62.92 + t * (0.32217 + t * 0.005589)
        }
        y if (2050.0..2150.0).contains(&y) => {
            -20.0 + 32.0 * ((y - 1820.0) / 100.0).powi(2) - 0.5628 * (2150.0 - y)
        }
        y => {
            let u = (y - 1820.0) / 100.0;
            -20.0 + 32.0 * u * u
        }
    }
}

/// Julian Date UT → Julian Date TT.
pub fn jd_ut_to_tt(jd_ut: f64) -> f64 {
    jd_ut + delta_t_seconds(jd_ut) / SECONDS_PER_DAY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_t_year_2000() {
        let dt = delta_t_seconds(J2000_JD);
        assert!((dt - 63.8).abs() < 1.0, "ΔT(2000) = {dt}");
    }

    #[test]
    fn delta_t_1950() {
        let dt = delta_t_seconds(calendar_to_jd(1950, 1, 1.0));
        assert!((dt - 29.0).abs() < 1.5, "ΔT(1950) = {dt}");
    }

    #[test]
    fn tt_is_ahead_of_ut() {
        let jd = 2_450_000.5;
        assert!(jd_ut_to_tt(jd) > jd);
    }
}
