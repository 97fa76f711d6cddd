//! Abridged lunar theory.
//!
//! The largest periodic terms of Meeus, "Astronomical Algorithms" (2nd ed),
//! Ch. 47, Tables 47.A/47.B. Accuracy is a few arc-minutes in longitude,
//! ample for sign, nakshatra and dasha-balance work.

/// `[D, M, M', F, amplitude]`; amplitude in degrees (longitude/latitude) or km (distance).
type Term = [f64; 5];

#[rustfmt::skip]
const LONGITUDE_TERMS: [Term; 22] = [
    [0.0,  0.0,  1.0,  0.0,  6.288_774],
    [2.0,  0.0, -1.0,  0.0,  1.274_027],
    [2.0,  0.0,  0.0,  0.0,  0.658_314],
    [0.0,  0.0,  2.0,  0.0,  0.213_618],
    [0.0,  1.0,  0.0,  0.0, -0.185_116],
    [0.0,  0.0,  0.0,  2.0, -0.114_332],
    [2.0,  0.0, -2.0,  0.0,  0.058_793],
    [2.0, -1.0, -1.0,  0.0,  0.057_066],
    [2.0,  0.0,  1.0,  0.0,  0.053_322],
    [2.0, -1.0,  0.0,  0.0,  0.045_758],
    [0.0,  1.0, -1.0,  0.0, -0.040_923],
    [1.0,  0.0,  0.0,  0.0, -0.034_720],
    [0.0,  1.0,  1.0,  0.0, -0.030_383],
    [2.0,  0.0,  0.0, -2.0,  0.015_327],
    [0.0,  0.0,  1.0,  2.0, -0.012_528],
    [0.0,  0.0,  1.0, -2.0,  0.010_980],
    [4.0,  0.0, -1.0,  0.0,  0.010_675],
    [0.0,  0.0,  3.0,  0.0,  0.010_034],
    [4.0,  0.0, -2.0,  0.0,  0.008_548],
    [2.0,  1.0, -1.0,  0.0, -0.007_888],
    [2.0,  1.0,  0.0,  0.0, -0.006_766],
    [1.0,  0.0, -1.0,  0.0, -0.005_163],
];

#[rustfmt::skip]
const LATITUDE_TERMS: [Term; 8] = [
    [0.0,  0.0,  0.0,  1.0,  5.128_122],
    [0.0,  0.0,  1.0,  1.0,  0.280_602],
    [0.0,  0.0,  1.0, -1.0,  0.277_693],
    [2.0,  0.0,  0.0, -1.0,  0.173_237],
    [2.0,  0.0, -1.0,  1.0,  0.055_413],
    [2.0,  0.0, -1.0, -1.0,  0.046_271],
    [2.0,  0.0,  0.0,  1.0,  0.032_573],
    [0.0,  0.0,  2.0,  1.0,  0.017_198],
];

#[rustfmt::skip]
const DISTANCE_TERMS: [Term; 12] = [
    [0.0,  0.0,  1.0,  0.0, -20_905.355],
    [2.0,  0.0, -1.0,  0.0,  -3_699.111],
    [2.0,  0.0,  0.0,  0.0,  -2_955.968],
    [0.0,  0.0,  2.0,  0.0,    -569.925],
    [0.0,  1.0,  0.0,  0.0,      48.888],
    [2.0,  0.0, -2.0,  0.0,     246.158],
    [2.0, -1.0, -1.0,  0.0,    -170.733],
    [2.0,  0.0,  1.0,  0.0,    -152.138],
    [2.0, -1.0,  0.0,  0.0,    -204.586],
    [0.0,  1.0, -1.0,  0.0,    -129.620],
    [1.0,  0.0,  0.0,  0.0,     108.743],
    [0.0,  1.0,  1.0,  0.0,     104.755],
];

const KM_PER_AU: f64 = 149_597_870.7;

/// Geocentric Moon: `(longitude_deg, latitude_deg, distance_au)`, mean equinox of date.
pub fn moon_position(t: f64) -> (f64, f64, f64) {
    let mean_lon = 218.316_447_7 + 481_267.881_234_21 * t - 0.001_578_6 * t * t;
    let d = (297.850_192_1 + 445_267.111_403_4 * t - 0.001_881_9 * t * t).to_radians();
    let m = (357.529_109_2 + 35_999.050_290_9 * t - 0.000_153_6 * t * t).to_radians();
    let mp = (134.963_396_4 + 477_198.867_505_5 * t + 0.008_741_4 * t * t).to_radians();
    let f = (93.272_095_0 + 483_202.017_523_3 * t - 0.003_653_9 * t * t).to_radians();
    let ecc = 1.0 - 0.002_516 * t - 0.000_007_4 * t * t;

    let arg = |term: &Term| term[0] * d + term[1] * m + term[2] * mp + term[3] * f;
    // Terms containing the Sun's anomaly are scaled by E per power of M.
    let scale = |term: &Term| ecc.powi(term[1].abs() as i32);

    let sum_sin = |terms: &[Term]| -> f64 {
        terms.iter().map(|tm| tm[4] * scale(tm) * arg(tm).sin()).sum()
    };
    let sum_cos: f64 = DISTANCE_TERMS
        .iter()
        .map(|tm| tm[4] * scale(tm) * arg(tm).cos())
        .sum();

    let lon = (mean_lon + sum_sin(&LONGITUDE_TERMS)).rem_euclid(360.0);
    let lat = sum_sin(&LATITUDE_TERMS);
    let dist_au = (385_000.56 + sum_cos) / KM_PER_AU;
    (lon, lat, dist_au)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Meeus Example 47.a: 1992-Apr-12 0h TD, λ = 133.162655°, β = −3.229126°.
    #[test]
    fn meeus_example_47a() {
        let t = (2_448_724.5 - 2_451_545.0) / 36_525.0;
        let (lon, lat, dist) = moon_position(t);
        assert!((lon - 133.162_655).abs() < 0.05, "lon = {lon}");
        assert!((lat + 3.229_126).abs() < 0.05, "lat = {lat}");
        let km = dist * KM_PER_AU;
        assert!((km - 368_409.7).abs() < 500.0, "dist = {km}");
    }

    #[test]
    fn latitude_bounded_by_inclination() {
        for i in 0..200 {
            let t = -0.5 + i as f64 * 0.005;
            let (_, lat, _) = moon_position(t);
            assert!(lat.abs() < 5.4, "lat = {lat}");
        }
    }
}
