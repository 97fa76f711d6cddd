//! Graha dignity and natural relationships.
//!
//! Exaltation/debilitation points, own signs, natural (naisargika)
//! friendship and the four-way dignity classification used for strength
//! scoring. Node exaltation follows the common Rahu-in-Vrishabha /
//! Ketu-in-Vrischika convention.

use serde::{Deserialize, Serialize};

use crate::graha::Graha;
use crate::util::{normalize_360, rashi_index_of};

/// Exaltation point (sidereal degrees).
///
/// Sun 10 Ari, Moon 3 Tau, Mars 28 Cap, Mercury 15 Vir, Jupiter 5 Can,
/// Venus 27 Pis, Saturn 20 Lib, Rahu 20 Tau, Ketu 20 Sco.
pub const fn exaltation_degree(graha: Graha) -> f64 {
    match graha {
        Graha::Surya => 10.0,
        Graha::Chandra => 33.0,
        Graha::Mangal => 298.0,
        Graha::Buddh => 165.0,
        Graha::Guru => 95.0,
        Graha::Shukra => 357.0,
        Graha::Shani => 200.0,
        Graha::Rahu => 50.0,
        Graha::Ketu => 230.0,
    }
}

/// Debilitation point = exaltation + 180 mod 360.
pub const fn debilitation_degree(graha: Graha) -> f64 {
    let d = exaltation_degree(graha) + 180.0;
    if d >= 360.0 { d - 360.0 } else { d }
}

/// Own-sign rashi indices.
///
/// Sun [4], Moon [3], Mars [0,7], Mercury [2,5], Jupiter [8,11],
/// Venus [1,6], Saturn [9,10], Rahu [10], Ketu [7].
pub fn own_signs(graha: Graha) -> &'static [u8] {
    match graha {
        Graha::Surya => &[4],
        Graha::Chandra => &[3],
        Graha::Mangal => &[0, 7],
        Graha::Buddh => &[2, 5],
        Graha::Guru => &[8, 11],
        Graha::Shukra => &[1, 6],
        Graha::Shani => &[9, 10],
        Graha::Rahu => &[10],
        Graha::Ketu => &[7],
    }
}

/// Natural relationship between two grahas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NaisargikaMaitri {
    Friend,
    Enemy,
    Neutral,
}

/// Natural (naisargika) friendship (BPHS table). Neutral for the nodes.
pub const fn naisargika_maitri(graha: Graha, other: Graha) -> NaisargikaMaitri {
    use Graha::*;
    use NaisargikaMaitri::*;

    match (graha, other) {
        (Rahu | Ketu, _) | (_, Rahu | Ketu) => Neutral,

        (Surya, Chandra | Mangal | Guru) => Friend,
        (Surya, Shukra | Shani) => Enemy,

        (Chandra, Surya | Buddh) => Friend,

        (Mangal, Surya | Chandra | Guru) => Friend,
        (Mangal, Buddh) => Enemy,

        (Buddh, Surya | Shukra) => Friend,
        (Buddh, Chandra) => Enemy,

        (Guru, Surya | Chandra | Mangal) => Friend,
        (Guru, Buddh | Shukra) => Enemy,

        (Shukra, Buddh | Shani) => Friend,
        (Shukra, Surya | Chandra) => Enemy,

        (Shani, Buddh | Shukra) => Friend,
        (Shani, Surya | Chandra | Mangal) => Enemy,

        _ => Neutral,
    }
}

/// Dignity of a graha at a longitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dignity {
    Exalted,
    Debilitated,
    OwnSign,
    Neutral,
}

/// Dignity from sidereal longitude.
///
/// Priority: exaltation sign > debilitation sign > own sign > neutral.
pub fn dignity(graha: Graha, sidereal_lon: f64) -> Dignity {
    let rashi = rashi_index_of(sidereal_lon);
    if rashi == rashi_index_of(exaltation_degree(graha)) {
        Dignity::Exalted
    } else if rashi == rashi_index_of(debilitation_degree(graha)) {
        Dignity::Debilitated
    } else if own_signs(graha).contains(&rashi) {
        Dignity::OwnSign
    } else {
        Dignity::Neutral
    }
}

/// Arc from the exaltation point, degrees in [0, 180].
pub fn distance_from_exaltation(graha: Graha, sidereal_lon: f64) -> f64 {
    let d = normalize_360(sidereal_lon - exaltation_degree(graha));
    if d > 180.0 { 360.0 - d } else { d }
}

/// Natural benefic/malefic classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BeneficNature {
    Benefic,
    Malefic,
}

/// Jupiter, Venus, Mercury and the Moon are natural benefics.
pub const fn natural_benefic_malefic(graha: Graha) -> BeneficNature {
    match graha {
        Graha::Guru | Graha::Shukra | Graha::Buddh | Graha::Chandra => BeneficNature::Benefic,
        _ => BeneficNature::Malefic,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graha::ALL_GRAHAS;

    #[test]
    fn debilitation_opposite_exaltation() {
        for g in ALL_GRAHAS {
            let d = normalize_360(debilitation_degree(g) - exaltation_degree(g));
            assert!((d - 180.0).abs() < 1e-12, "{g:?}");
        }
    }

    #[test]
    fn sun_exalted_in_mesha() {
        assert_eq!(dignity(Graha::Surya, 15.0), Dignity::Exalted);
        assert_eq!(dignity(Graha::Surya, 195.0), Dignity::Debilitated);
        assert_eq!(dignity(Graha::Surya, 125.0), Dignity::OwnSign);
        assert_eq!(dignity(Graha::Surya, 65.0), Dignity::Neutral);
    }

    #[test]
    fn exaltation_beats_own_sign() {
        // Ketu: exalted and own sign both in Vrischika.
        assert_eq!(dignity(Graha::Ketu, 215.0), Dignity::Exalted);
    }

    #[test]
    fn exaltation_distance() {
        assert!((distance_from_exaltation(Graha::Shukra, 357.0)).abs() < 1e-12);
        assert!((distance_from_exaltation(Graha::Shukra, 7.0) - 10.0).abs() < 1e-12);
        assert!((distance_from_exaltation(Graha::Shukra, 177.0) - 180.0).abs() < 1e-12);
    }

    #[test]
    fn friendship_is_table_driven() {
        assert_eq!(naisargika_maitri(Graha::Surya, Graha::Guru), NaisargikaMaitri::Friend);
        assert_eq!(naisargika_maitri(Graha::Shani, Graha::Surya), NaisargikaMaitri::Enemy);
        assert_eq!(naisargika_maitri(Graha::Chandra, Graha::Shani), NaisargikaMaitri::Neutral);
        assert_eq!(naisargika_maitri(Graha::Rahu, Graha::Surya), NaisargikaMaitri::Neutral);
    }

    #[test]
    fn benefics() {
        assert_eq!(natural_benefic_malefic(Graha::Guru), BeneficNature::Benefic);
        assert_eq!(natural_benefic_malefic(Graha::Shani), BeneficNature::Malefic);
    }
}
