//! Hand-built charts for unit tests.

use std::collections::BTreeMap;

use chrono::{TimeZone, Utc};
use dhruv_vedic_base::{GeoLocation, Graha, HouseSystem, house_cusps, house_of};

use crate::types::{BodyPosition, ChartPositions};

/// Chart at 2000-01-01 12:00 UTC on the equator at Greenwich, ascendant 0°
/// Mesha, whole-sign houses, every graha moving at unit speed.
pub(crate) fn chart_with(longitudes: &[(Graha, f64)]) -> ChartPositions {
    chart_with_ascendant(0.0, longitudes)
}

pub(crate) fn chart_with_ascendant(ascendant: f64, longitudes: &[(Graha, f64)]) -> ChartPositions {
    let cusps = house_cusps(HouseSystem::WholeSign, ascendant, ascendant + 270.0);
    let bodies: BTreeMap<Graha, BodyPosition> = longitudes
        .iter()
        .map(|&(graha, longitude)| {
            (
                graha,
                BodyPosition {
                    graha,
                    longitude,
                    latitude: 0.0,
                    speed: 1.0,
                    house: house_of(longitude, &cusps),
                },
            )
        })
        .collect();

    ChartPositions {
        time: Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap(),
        jd_ut: 2_451_545.0,
        location: GeoLocation {
            latitude_deg: 0.0,
            longitude_deg: 0.0,
        },
        ayanamsha_deg: 23.853,
        ascendant,
        mc: (ascendant + 270.0) % 360.0,
        cusps,
        bodies,
    }
}
