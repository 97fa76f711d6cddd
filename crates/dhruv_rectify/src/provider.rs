//! Collaborator seams: positions, dasha periods and divisional charts.
//!
//! The engine only sees the three traits. The default implementations wire
//! them to the analytic ephemeris and the Vimshottari/Parashari tables.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use dhruv_core::{Engine, EngineConfig, Query};
use dhruv_time::utc_to_jd;
use dhruv_vedic_base::{
    Amsha, GeoLocation, Graha, LunarNode, SAPTA_GRAHAS, amsha_longitude, ayanamsha_deg,
    house_cusps, house_of, lagna_and_mc, lunar_node_deg, normalize_360, rashi_index_of,
    rashi_lord_by_index, tropical_to_sidereal, vimshottari_snapshot,
};
use serde::Serialize;

use crate::config::ChartConfig;
use crate::error::ComputationError;
use crate::types::{BodyPosition, ChartPositions};

/// `(time, location) → chart positions`. Must be pure.
pub trait PositionProvider: Send + Sync {
    fn compute(
        &self,
        time: DateTime<Utc>,
        location: &GeoLocation,
    ) -> Result<ChartPositions, ComputationError>;
}

/// Ruling lords active at one instant, outermost first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ActivePeriods {
    pub major: Option<Graha>,
    pub sub: Option<Graha>,
    pub sub_sub: Option<Graha>,
}

impl ActivePeriods {
    pub fn is_empty(&self) -> bool {
        self.major.is_none()
    }
}

/// Active dasha periods of a natal chart at a later instant.
pub trait DashaPeriodProvider: Send + Sync {
    fn active_periods(
        &self,
        natal: &ChartPositions,
        time: DateTime<Utc>,
    ) -> Result<ActivePeriods, ComputationError>;
}

/// A divisional chart derived from natal positions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DivisionalChart {
    pub amsha: Amsha,
    pub ascendant: f64,
    pub longitudes: BTreeMap<Graha, f64>,
    /// Whole-sign houses from the divisional ascendant.
    pub houses: BTreeMap<Graha, u8>,
}

impl DivisionalChart {
    pub fn occupants(&self, house: u8) -> Vec<Graha> {
        self.houses
            .iter()
            .filter(|(_, h)| **h == house)
            .map(|(g, _)| *g)
            .collect()
    }

    /// Lord of the sign on a 1-based house.
    pub fn house_lord(&self, house: u8) -> Option<Graha> {
        let asc_rashi = rashi_index_of(self.ascendant);
        rashi_lord_by_index((asc_rashi + house.saturating_sub(1)) % 12)
    }

    pub fn house_of(&self, graha: Graha) -> Option<u8> {
        self.houses.get(&graha).copied()
    }
}

/// `(positions, chart id) → divisional positions`.
pub trait DivisionalChartProvider: Send + Sync {
    fn chart(&self, positions: &ChartPositions, amsha: Amsha) -> DivisionalChart;
}

/// Position provider backed by the analytic ephemeris.
#[derive(Debug, Clone)]
pub struct EphemerisProvider {
    engine: Engine,
    chart: ChartConfig,
}

/// Step for the node speed central difference, Julian centuries (half a day).
const NODE_SPEED_STEP: f64 = 0.5 / 36_525.0;

impl EphemerisProvider {
    pub fn new(engine: Engine, chart: ChartConfig) -> Self {
        Self { engine, chart }
    }

    pub fn with_chart_config(chart: ChartConfig) -> Result<Self, ComputationError> {
        Ok(Self::new(Engine::new(EngineConfig::default())?, chart))
    }

    pub fn chart_config(&self) -> &ChartConfig {
        &self.chart
    }

    fn node(&self, node: LunarNode, t: f64) -> (f64, f64) {
        let mode = self.chart.node_mode;
        let lon = lunar_node_deg(node, t, mode);
        let ahead = lunar_node_deg(node, t + NODE_SPEED_STEP, mode);
        let behind = lunar_node_deg(node, t - NODE_SPEED_STEP, mode);
        let delta = normalize_360(ahead - behind + 180.0) - 180.0;
        (lon, delta)
    }
}

fn finite(value: f64, graha: Option<Graha>, quantity: &'static str) -> Result<f64, ComputationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ComputationError::NonFinite { graha, quantity })
    }
}

impl PositionProvider for EphemerisProvider {
    fn compute(
        &self,
        time: DateTime<Utc>,
        location: &GeoLocation,
    ) -> Result<ChartPositions, ComputationError> {
        let jd_ut = utc_to_jd(&time);
        let t = self.engine.tt_centuries(jd_ut);
        let system = self.chart.ayanamsha;

        let (asc_trop, mc_trop) = lagna_and_mc(jd_ut, t, location);
        let ascendant = finite(tropical_to_sidereal(asc_trop, system, t), None, "ascendant")?;
        let mc = finite(tropical_to_sidereal(mc_trop, system, t), None, "midheaven")?;
        let cusps = house_cusps(self.chart.house_system, ascendant, mc);

        let grahas: Vec<(Graha, dhruv_core::Body)> = SAPTA_GRAHAS
            .iter()
            .filter_map(|g| g.body().map(|b| (*g, b)))
            .collect();
        let queries: Vec<Query> = grahas
            .iter()
            .map(|&(_, body)| Query {
                target: body,
                epoch_jd_ut: jd_ut,
            })
            .collect();

        let mut bodies = BTreeMap::new();
        for (&(graha, _), state) in grahas.iter().zip(self.engine.query_batch(&queries)) {
            let state = state?;
            let longitude = finite(
                tropical_to_sidereal(state.longitude_deg, system, t),
                Some(graha),
                "longitude",
            )?;
            bodies.insert(
                graha,
                BodyPosition {
                    graha,
                    longitude,
                    latitude: finite(state.latitude_deg, Some(graha), "latitude")?,
                    speed: finite(state.speed_deg_per_day, Some(graha), "speed")?,
                    house: house_of(longitude, &cusps),
                },
            );
        }

        for (graha, node) in [(Graha::Rahu, LunarNode::Rahu), (Graha::Ketu, LunarNode::Ketu)] {
            let (trop, speed) = self.node(node, t);
            let longitude = finite(tropical_to_sidereal(trop, system, t), Some(graha), "longitude")?;
            bodies.insert(
                graha,
                BodyPosition {
                    graha,
                    longitude,
                    latitude: 0.0,
                    speed,
                    house: house_of(longitude, &cusps),
                },
            );
        }

        Ok(ChartPositions {
            time,
            jd_ut,
            location: *location,
            ayanamsha_deg: ayanamsha_deg(system, t),
            ascendant,
            mc,
            cusps,
            bodies,
        })
    }
}

/// Vimshottari periods keyed on the natal Moon.
#[derive(Debug, Clone, Copy, Default)]
pub struct VimshottariProvider;

impl DashaPeriodProvider for VimshottariProvider {
    fn active_periods(
        &self,
        natal: &ChartPositions,
        time: DateTime<Utc>,
    ) -> Result<ActivePeriods, ComputationError> {
        let moon = natal
            .body(Graha::Chandra)
            .ok_or_else(|| ComputationError::Provider("natal chart has no Moon".to_string()))?;
        let snap = vimshottari_snapshot(natal.jd_ut, moon.longitude, utc_to_jd(&time), 2);
        Ok(ActivePeriods {
            major: snap.major().map(|p| p.lord),
            sub: snap.sub().map(|p| p.lord),
            sub_sub: snap.sub_sub().map(|p| p.lord),
        })
    }
}

/// Parashari divisional charts with whole-sign houses.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParashariVargaProvider;

impl DivisionalChartProvider for ParashariVargaProvider {
    fn chart(&self, positions: &ChartPositions, amsha: Amsha) -> DivisionalChart {
        let ascendant = amsha_longitude(positions.ascendant, amsha);
        let asc_rashi = rashi_index_of(ascendant);

        let mut longitudes = BTreeMap::new();
        let mut houses = BTreeMap::new();
        for (graha, body) in &positions.bodies {
            let lon = amsha_longitude(body.longitude, amsha);
            longitudes.insert(*graha, lon);
            houses.insert(*graha, (rashi_index_of(lon) + 12 - asc_rashi) % 12 + 1);
        }

        DivisionalChart {
            amsha,
            ascendant,
            longitudes,
            houses,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use dhruv_vedic_base::ALL_GRAHAS;

    fn provider() -> EphemerisProvider {
        EphemerisProvider::with_chart_config(ChartConfig::default()).unwrap()
    }

    fn delhi() -> GeoLocation {
        GeoLocation::new(28.6139, 77.2090).unwrap()
    }

    #[test]
    fn computes_all_nine_grahas() {
        let t = Utc.with_ymd_and_hms(1990, 6, 15, 6, 30, 0).unwrap();
        let chart = provider().compute(t, &delhi()).unwrap();
        for g in ALL_GRAHAS {
            let b = chart.body(g).unwrap();
            assert!((0.0..360.0).contains(&b.longitude), "{g:?}");
            assert!((1..=12).contains(&b.house), "{g:?}");
        }
        let rahu = chart.body(Graha::Rahu).unwrap().longitude;
        let ketu = chart.body(Graha::Ketu).unwrap().longitude;
        assert!((normalize_360(ketu - rahu) - 180.0).abs() < 1e-9);
        assert!(chart.body(Graha::Rahu).unwrap().speed < 0.0);
    }

    #[test]
    fn ascendant_is_first_house() {
        let t = Utc.with_ymd_and_hms(2001, 3, 10, 22, 15, 0).unwrap();
        let chart = provider().compute(t, &delhi()).unwrap();
        assert_eq!(house_of(chart.ascendant, &chart.cusps), 1);
    }

    #[test]
    fn dasha_provider_reports_three_levels() {
        let birth = Utc.with_ymd_and_hms(1990, 6, 15, 6, 30, 0).unwrap();
        let natal = provider().compute(birth, &delhi()).unwrap();
        let later = Utc.with_ymd_and_hms(2015, 1, 1, 0, 0, 0).unwrap();
        let active = VimshottariProvider.active_periods(&natal, later).unwrap();
        assert!(active.major.is_some() && active.sub.is_some() && active.sub_sub.is_some());

        let before = Utc.with_ymd_and_hms(1980, 1, 1, 0, 0, 0).unwrap();
        assert!(VimshottariProvider.active_periods(&natal, before).unwrap().is_empty());
    }

    #[test]
    fn navamsha_chart_houses_are_whole_sign() {
        let t = Utc.with_ymd_and_hms(1990, 6, 15, 6, 30, 0).unwrap();
        let chart = provider().compute(t, &delhi()).unwrap();
        let d9 = ParashariVargaProvider.chart(&chart, Amsha::D9);
        assert_eq!(d9.longitudes.len(), 9);
        for (g, h) in &d9.houses {
            let expected =
                (rashi_index_of(d9.longitudes[g]) + 12 - rashi_index_of(d9.ascendant)) % 12 + 1;
            assert_eq!(*h, expected);
        }
        assert!(d9.house_lord(1).is_some());
    }
}
