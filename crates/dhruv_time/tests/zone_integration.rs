//! Local birth time → UTC → Julian Date → sidereal time, end to end.

use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use dhruv_time::{
    J2000_JD, TimeError, gmst_deg, jd_to_utc, local_sidereal_time_deg, local_to_utc,
    parse_offset, utc_to_jd,
};

const EPS: f64 = 1e-9;

#[test]
fn indian_standard_time_resolves_to_utc() {
    let offset = parse_offset("+05:30").unwrap();
    let date = NaiveDate::from_ymd_opt(1990, 6, 15).unwrap();
    let time = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
    let utc = local_to_utc(date, time, offset).unwrap();
    assert_eq!(utc, Utc.with_ymd_and_hms(1990, 6, 15, 6, 30, 0).unwrap());
}

#[test]
fn negative_offset_crosses_midnight() {
    let offset = parse_offset("-0400").unwrap();
    let date = NaiveDate::from_ymd_opt(2000, 12, 31).unwrap();
    let time = NaiveTime::from_hms_opt(22, 15, 0).unwrap();
    let utc = local_to_utc(date, time, offset).unwrap();
    assert_eq!(utc, Utc.with_ymd_and_hms(2001, 1, 1, 2, 15, 0).unwrap());
}

#[test]
fn j2000_noon_maps_to_reference_jd() {
    let noon = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
    assert!((utc_to_jd(&noon) - J2000_JD).abs() < EPS);
    assert_eq!(jd_to_utc(J2000_JD).unwrap(), noon);
}

#[test]
fn local_sidereal_time_adds_east_longitude() {
    let jd = utc_to_jd(&Utc.with_ymd_and_hms(1990, 6, 15, 6, 30, 0).unwrap());
    let gmst = gmst_deg(jd);
    let lst = local_sidereal_time_deg(jd, 77.209);
    let diff = (lst - gmst).rem_euclid(360.0);
    assert!((diff - 77.209).abs() < 1e-6, "diff = {diff}");
}

#[test]
fn named_zones_are_rejected() {
    assert!(matches!(
        parse_offset("Asia/Kolkata"),
        Err(TimeError::InvalidOffset(_))
    ));
}
