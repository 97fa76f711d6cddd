//! Shared utility functions for vedic calculations.

/// Normalize an angle to [0, 360) degrees.
pub fn normalize_360(deg: f64) -> f64 {
    let r = deg % 360.0;
    if r < 0.0 { r + 360.0 } else { r }
}

/// Unsigned separation of two longitudes, degrees in [0, 180].
pub fn angular_separation(a: f64, b: f64) -> f64 {
    let d = normalize_360(a - b);
    if d > 180.0 { 360.0 - d } else { d }
}

/// 0-based rashi index (0 = Mesha) of a sidereal longitude.
pub fn rashi_index_of(sidereal_lon: f64) -> u8 {
    ((normalize_360(sidereal_lon) / 30.0).floor() as u8).min(11)
}
