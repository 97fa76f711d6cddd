//! Ecliptic frame helpers: obliquity, precession and fundamental arguments.
//!
//! Sources:
//! - Mean obliquity: IAU 2006 (Hilton et al. 2006).
//! - General precession in longitude: IAU 2006 (Capitaine et al. 2003).
//! - Delaunay arguments: IERS Conventions 2010, Eq. 5.43.

const ARCSEC_PER_DEG: f64 = 3600.0;
const ARCSEC_TO_RAD: f64 = std::f64::consts::PI / (180.0 * ARCSEC_PER_DEG);

/// Mean obliquity of the ecliptic of date, degrees. `t` in TT centuries.
pub fn mean_obliquity_deg(t: f64) -> f64 {
    let arcsec = 84_381.406
        + t * (-46.836_769 + t * (-0.000_183_1 + t * (0.002_003_40 + t * (-0.000_000_576 - t * 0.000_000_043_4))));
    arcsec / ARCSEC_PER_DEG
}

/// Accumulated general precession in longitude since J2000.0, degrees.
pub fn general_precession_longitude_deg(t: f64) -> f64 {
    let arcsec = t * (5028.796_195 + t * (1.105_434_8 + t * (0.000_079_64 + t * (-0.000_023_857 - t * 0.000_000_038_3))));
    arcsec / ARCSEC_PER_DEG
}

/// Delaunay fundamental arguments `[l, l', F, D, Ω]` in radians.
pub fn fundamental_arguments(t: f64) -> [f64; 5] {
    let poly = |c: [f64; 5]| -> f64 {
        let arcsec = c[0] + t * (c[1] + t * (c[2] + t * (c[3] + t * c[4])));
        (arcsec * ARCSEC_TO_RAD).rem_euclid(std::f64::consts::TAU)
    };
    [
        poly([485_868.249_036, 1_717_915_923.217_8, 31.879_2, 0.051_635, -0.000_244_70]),
        poly([1_287_104.793_05, 129_596_581.048_1, -0.553_2, 0.000_136, -0.000_011_49]),
        poly([335_779.526_232, 1_739_527_262.847_8, -12.751_2, -0.001_037, 0.000_004_17]),
        poly([1_072_260.703_69, 1_602_961_601.209_0, -6.370_6, 0.006_593, -0.000_031_69]),
        poly([450_160.398_036, -6_962_890.543_1, 7.472_2, 0.007_702, -0.000_059_39]),
    ]
}

/// Cartesian `[x, y, z]` to `(longitude_deg [0,360), latitude_deg, radius)`.
pub fn cartesian_to_spherical(v: [f64; 3]) -> (f64, f64, f64) {
    let rxy = v[0].hypot(v[1]);
    let r = rxy.hypot(v[2]);
    let lon = v[1].atan2(v[0]).to_degrees().rem_euclid(360.0);
    let lat = v[2].atan2(rxy).to_degrees();
    (lon, lat, r)
}

/// Signed shortest angular difference `b − a`, degrees in (−180, 180].
pub fn angle_diff_deg(a: f64, b: f64) -> f64 {
    let d = (b - a).rem_euclid(360.0);
    if d > 180.0 { d - 360.0 } else { d }
}
