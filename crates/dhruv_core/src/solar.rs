//! Geocentric Sun from the equation of centre (Meeus Ch. 25, low precision).

const KM_PER_AU: f64 = 149_597_870.7;

/// Geocentric Sun: `(longitude_deg, distance_au)`, mean equinox of date.
/// Latitude is below 1″ and taken as zero.
pub fn sun_position(t: f64) -> (f64, f64) {
    let l0 = 280.466_46 + t * (36_000.769_83 + t * 0.000_303_2);
    let m = (357.529_11 + t * (35_999.050_29 - t * 0.000_153_7)).to_radians();
    let e = 0.016_708_634 - t * (0.000_042_037 + t * 0.000_000_126_7);

    let c = (1.914_602 - t * (0.004_817 + t * 0.000_014)) * m.sin()
        + (0.019_993 - t * 0.000_101) * (2.0 * m).sin()
        + 0.000_289 * (3.0 * m).sin();

    let true_lon = (l0 + c).rem_euclid(360.0);
    let nu = m + c.to_radians();
    let r = 1.000_001_018 * (1.0 - e * e) / (1.0 + e * nu.cos());
    (true_lon, r)
}

/// Sun's geocentric distance in km, convenience for diagnostics.
pub fn sun_distance_km(t: f64) -> f64 {
    sun_position(t).1 * KM_PER_AU
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Meeus Example 25.a: 1992-Oct-13.0 TD, ☉ = 199.90988°, R = 0.99766 au.
    #[test]
    fn meeus_example_25a() {
        let t = (2_448_908.5 - 2_451_545.0) / 36_525.0;
        let (lon, r) = sun_position(t);
        assert!((lon - 199.909_88).abs() < 1e-4, "lon = {lon}");
        assert!((r - 0.997_66).abs() < 1e-5, "r = {r}");
    }

    #[test]
    fn distance_between_perihelion_and_aphelion() {
        for i in 0..365 {
            let t = i as f64 / 36_525.0;
            let km = sun_distance_km(t);
            assert!((147.0e6..152.2e6).contains(&km), "km = {km}");
        }
    }
}
