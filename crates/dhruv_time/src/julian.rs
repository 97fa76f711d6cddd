//! Julian Date ↔ calendar conversions.
//!
//! Gregorian calendar after 1582-Oct-15, Julian before (Meeus, "Astronomical
//! Algorithms", Ch. 7). Instants from `chrono` map onto JD UT via the Unix
//! epoch, millisecond resolution.

use chrono::{DateTime, Utc};

use crate::error::TimeError;

/// Julian Date of J2000.0 (2000-Jan-01 12:00 TT).
pub const J2000_JD: f64 = 2_451_545.0;

/// Julian Date of the Unix epoch (1970-Jan-01 00:00 UTC).
pub const UNIX_EPOCH_JD: f64 = 2_440_587.5;

/// Seconds in one day.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Days in a Julian century.
pub const DAYS_PER_CENTURY: f64 = 36_525.0;

const MILLIS_PER_DAY: f64 = SECONDS_PER_DAY * 1000.0;

/// Calendar date (with fractional day) to Julian Date.
pub fn calendar_to_jd(year: i32, month: u32, day_frac: f64) -> f64 {
    let (y, m) = if month <= 2 {
        (year as f64 - 1.0, month as f64 + 12.0)
    } else {
        (year as f64, month as f64)
    };

    // Gregorian correction applies from 1582-Oct-15.
    let gregorian = (year, month, day_frac) >= (1582, 10, 15.0);
    let b = if gregorian {
        let a = (y / 100.0).floor();
        2.0 - a + (a / 4.0).floor()
    } else {
        0.0
    };

    (365.25 * (y + 4716.0)).floor() + (30.6001 * (m + 1.0)).floor() + day_frac + b - 1524.5
}

/// Julian Date to `(year, month, day_frac)`.
pub fn jd_to_calendar(jd: f64) -> (i32, u32, f64) {
    let jd5 = jd + 0.5;
    let z = jd5.floor();
    let f = jd5 - z;

    let a = if z < 2_299_161.0 {
        z
    } else {
        let alpha = ((z - 1_867_216.25) / 36_524.25).floor();
        z + 1.0 + alpha - (alpha / 4.0).floor()
    };
    let b = a + 1524.0;
    let c = ((b - 122.1) / 365.25).floor();
    let d = (365.25 * c).floor();
    let e = ((b - d) / 30.6001).floor();

    let day = b - d - (30.6001 * e).floor() + f;
    let month = if e < 14.0 { e - 1.0 } else { e - 13.0 };
    let year = if month > 2.0 { c - 4716.0 } else { c - 4715.0 };

    (year as i32, month as u32, day)
}

/// Julian centuries since J2000.0.
pub fn jd_to_centuries(jd: f64) -> f64 {
    (jd - J2000_JD) / DAYS_PER_CENTURY
}

/// UTC instant to Julian Date (UT).
pub fn utc_to_jd(instant: &DateTime<Utc>) -> f64 {
    UNIX_EPOCH_JD + instant.timestamp_millis() as f64 / MILLIS_PER_DAY
}

/// Julian Date (UT) to a UTC instant, rounded to the millisecond.
pub fn jd_to_utc(jd: f64) -> Result<DateTime<Utc>, TimeError> {
    if !jd.is_finite() {
        return Err(TimeError::JdOutOfRange(jd));
    }
    let millis = ((jd - UNIX_EPOCH_JD) * MILLIS_PER_DAY).round();
    if millis.abs() > i64::MAX as f64 {
        return Err(TimeError::JdOutOfRange(jd));
    }
    DateTime::from_timestamp_millis(millis as i64).ok_or(TimeError::JdOutOfRange(jd))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn j2000_calendar() {
        let jd = calendar_to_jd(2000, 1, 1.5);
        assert!((jd - J2000_JD).abs() < 1e-9, "jd = {jd}");
    }

    #[test]
    fn meeus_example_sputnik() {
        // Meeus Example 7.a: 1957-Oct-4.81 = JD 2436116.31
        let jd = calendar_to_jd(1957, 10, 4.81);
        assert!((jd - 2_436_116.31).abs() < 1e-6, "jd = {jd}");
    }

    #[test]
    fn julian_calendar_before_reform() {
        // Meeus Example 7.b: 333-Jan-27.5 = JD 1842713.0
        let jd = calendar_to_jd(333, 1, 27.5);
        assert!((jd - 1_842_713.0).abs() < 1e-6, "jd = {jd}");
    }

    #[test]
    fn calendar_roundtrip() {
        let (y, m, d) = jd_to_calendar(2_436_116.31);
        assert_eq!((y, m), (1957, 10));
        assert!((d - 4.81).abs() < 1e-6, "day = {d}");
    }

    #[test]
    fn utc_instant_to_jd() {
        let t = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
        assert!((utc_to_jd(&t) - J2000_JD).abs() < 1e-9);
    }

    #[test]
    fn jd_back_to_utc() {
        let t = Utc.with_ymd_and_hms(1990, 6, 15, 4, 30, 0).unwrap();
        let back = jd_to_utc(utc_to_jd(&t)).unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn non_finite_jd_rejected() {
        assert!(matches!(
            jd_to_utc(f64::NAN),
            Err(TimeError::JdOutOfRange(_))
        ));
    }

    #[test]
    fn centuries_at_j2000_is_zero() {
        assert_eq!(jd_to_centuries(J2000_JD), 0.0);
    }
}
