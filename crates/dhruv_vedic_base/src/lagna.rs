//! Lagna (Ascendant) and MC (Midheaven) computation.
//!
//! Standard spherical astronomy (Meeus, "Astronomical Algorithms", Ch. 13):
//!
//! - `Asc = atan2(-cos(LST), sin(LST)*cos(eps) + tan(phi)*sin(eps))`
//! - `MC  = atan2(sin(LST), cos(LST)*cos(eps))`
//!
//! All results are tropical ecliptic longitudes of date.

use std::f64::consts::TAU;

use dhruv_core::mean_obliquity_deg;
use dhruv_time::local_sidereal_time_deg;
use serde::{Deserialize, Serialize};

use crate::error::VedicError;

/// Observer position on Earth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    /// Geodetic latitude in degrees, north positive. Range: [-90, 90].
    pub latitude_deg: f64,
    /// Geodetic longitude in degrees, east positive. Range: [-180, 180].
    pub longitude_deg: f64,
}

impl GeoLocation {
    /// Create a location, rejecting non-finite or out-of-range coordinates.
    pub fn new(latitude_deg: f64, longitude_deg: f64) -> Result<Self, VedicError> {
        if !latitude_deg.is_finite() || !(-90.0..=90.0).contains(&latitude_deg) {
            return Err(VedicError::InvalidLocation("latitude must be within [-90, 90]"));
        }
        if !longitude_deg.is_finite() || !(-180.0..=180.0).contains(&longitude_deg) {
            return Err(VedicError::InvalidLocation("longitude must be within [-180, 180]"));
        }
        Ok(Self {
            latitude_deg,
            longitude_deg,
        })
    }
}

/// Lagna and MC from local sidereal time, latitude and obliquity (all degrees).
///
/// Returns `(lagna_deg, mc_deg)`, both in [0, 360).
pub fn lagna_and_mc_from_lst(lst_deg: f64, latitude_deg: f64, obliquity_deg: f64) -> (f64, f64) {
    let lst = lst_deg.to_radians();
    let eps = obliquity_deg.to_radians();
    // Keep tan(phi) finite at the poles.
    let phi = latitude_deg.clamp(-89.999_999, 89.999_999).to_radians();

    let asc = f64::atan2(-lst.cos(), lst.sin() * eps.cos() + phi.tan() * eps.sin());
    let mc = f64::atan2(lst.sin(), lst.cos() * eps.cos());

    (
        asc.rem_euclid(TAU).to_degrees(),
        mc.rem_euclid(TAU).to_degrees(),
    )
}

/// Tropical Lagna and MC for a UT instant and location.
///
/// `t_centuries` drives the obliquity of date; pass TT centuries.
pub fn lagna_and_mc(jd_ut: f64, t_centuries: f64, location: &GeoLocation) -> (f64, f64) {
    let lst = local_sidereal_time_deg(jd_ut, location.longitude_deg);
    lagna_and_mc_from_lst(lst, location.latitude_deg, mean_obliquity_deg(t_centuries))
}
