//! Keplerian mean elements and heliocentric positions of the planets.
//!
//! Elements and secular rates: Standish, "Keplerian Elements for
//! Approximate Positions of the Major Planets" (JPL, Table 1, 1800–2050 AD),
//! referred to the mean ecliptic and equinox of J2000.0.

use std::f64::consts::TAU;

/// Bodies with a Keplerian element set. `EarthMoonBarycenter` stands in for
/// the Earth when forming geocentric vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orbit {
    Mercury,
    Venus,
    EarthMoonBarycenter,
    Mars,
    Jupiter,
    Saturn,
}

/// `[a (au), e, I (deg), L (deg), ϖ (deg), Ω (deg)]` at J2000 and per century.
struct ElementSet {
    base: [f64; 6],
    rate: [f64; 6],
}

#[rustfmt::skip]
const fn elements(orbit: Orbit) -> ElementSet {
    match orbit {
        Orbit::Mercury => ElementSet {
            base: [0.387_099_27, 0.205_635_93, 7.004_979_02, 252.250_323_50, 77.457_796_28, 48.330_765_93],
            rate: [0.000_000_37, 0.000_019_06, -0.005_947_49, 149_472.674_111_75, 0.160_476_89, -0.125_340_81],
        },
        Orbit::Venus => ElementSet {
            base: [0.723_335_66, 0.006_776_72, 3.394_676_05, 181.979_099_50, 131.602_467_18, 76.679_842_55],
            rate: [0.000_003_90, -0.000_041_07, -0.000_788_90, 58_517.815_387_29, 0.002_683_29, -0.277_694_18],
        },
        Orbit::EarthMoonBarycenter => ElementSet {
            base: [1.000_002_61, 0.016_711_23, -0.000_015_31, 100.464_571_66, 102.937_681_93, 0.0],
            rate: [0.000_005_62, -0.000_043_92, -0.012_946_68, 35_999.372_449_81, 0.323_273_64, 0.0],
        },
        Orbit::Mars => ElementSet {
            base: [1.523_710_34, 0.093_394_10, 1.849_691_42, -4.553_432_05, -23.943_629_59, 49.559_538_91],
            rate: [0.000_018_47, 0.000_078_82, -0.008_131_31, 19_140.302_684_99, 0.444_410_88, -0.292_573_43],
        },
        Orbit::Jupiter => ElementSet {
            base: [5.202_887_00, 0.048_386_24, 1.304_396_95, 34.396_440_51, 14.728_479_83, 100.473_909_09],
            rate: [-0.000_116_07, -0.000_132_53, -0.001_837_14, 3_034.746_127_75, 0.212_526_68, 0.204_691_06],
        },
        Orbit::Saturn => ElementSet {
            base: [9.536_675_94, 0.053_861_79, 2.485_991_87, 49.954_244_23, 92.598_878_31, 113.662_424_48],
            rate: [-0.001_250_60, -0.000_509_91, 0.001_936_09, 1_222.493_622_01, -0.418_972_16, -0.288_677_94],
        },
    }
}

/// Solve Kepler's equation `E − e·sin E = M` by Newton iteration.
///
/// Returns `None` when the correction has not dropped below `tolerance`
/// within `max_iterations`.
pub fn solve_kepler(mean_anomaly_rad: f64, e: f64, tolerance: f64, max_iterations: u32) -> Option<f64> {
    let m = mean_anomaly_rad.rem_euclid(TAU);
    let mut ecc_anom = if e < 0.8 { m } else { std::f64::consts::PI };
    for _ in 0..max_iterations {
        let delta = (ecc_anom - e * ecc_anom.sin() - m) / (1.0 - e * ecc_anom.cos());
        ecc_anom -= delta;
        if delta.abs() < tolerance {
            return Some(ecc_anom);
        }
    }
    None
}

/// Heliocentric ecliptic J2000 position in au. `t` in TT centuries.
pub fn heliocentric_position(
    orbit: Orbit,
    t: f64,
    tolerance: f64,
    max_iterations: u32,
) -> Option<[f64; 3]> {
    let set = elements(orbit);
    let el: [f64; 6] = std::array::from_fn(|i| set.base[i] + set.rate[i] * t);
    let [a, e, incl, mean_lon, peri_lon, node] = el;

    let omega = (peri_lon - node).to_radians();
    let node = node.to_radians();
    let incl = incl.to_radians();
    let m = (mean_lon - peri_lon).to_radians();

    let ecc_anom = solve_kepler(m, e, tolerance, max_iterations)?;
    let xp = a * (ecc_anom.cos() - e);
    let yp = a * (1.0 - e * e).sqrt() * ecc_anom.sin();

    let (so, co) = omega.sin_cos();
    let (sn, cn) = node.sin_cos();
    let (si, ci) = incl.sin_cos();

    Some([
        (co * cn - so * sn * ci) * xp + (-so * cn - co * sn * ci) * yp,
        (co * sn + so * cn * ci) * xp + (-so * sn + co * cn * ci) * yp,
        (so * si) * xp + (co * si) * yp,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kepler_circular_orbit_is_identity() {
        let e = solve_kepler(1.234, 0.0, 1e-12, 10).unwrap();
        assert!((e - 1.234).abs() < 1e-12);
    }

    #[test]
    fn kepler_satisfies_equation() {
        let (m, e) = (2.0, 0.2);
        let ea = solve_kepler(m, e, 1e-12, 30).unwrap();
        assert!((ea - e * ea.sin() - m).abs() < 1e-10);
    }

    #[test]
    fn kepler_reports_non_convergence() {
        assert!(solve_kepler(2.0, 0.5, 1e-15, 0).is_none());
    }

    #[test]
    fn earth_distance_near_one_au() {
        let p = heliocentric_position(Orbit::EarthMoonBarycenter, 0.0, 1e-12, 30).unwrap();
        let r = (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt();
        assert!((r - 0.983).abs() < 0.01, "r = {r}");
    }

    #[test]
    fn jupiter_distance_range() {
        for &t in &[-0.5, 0.0, 0.25] {
            let p = heliocentric_position(Orbit::Jupiter, t, 1e-12, 30).unwrap();
            let r = (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt();
            assert!((4.9..5.5).contains(&r), "r = {r} at t = {t}");
        }
    }
}
