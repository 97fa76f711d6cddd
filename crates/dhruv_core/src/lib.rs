//! Analytic geocentric ephemeris engine.
//!
//! [`Engine`] evaluates ecliptic longitude, latitude, distance and daily
//! motion of the Sun, Moon and the five classical planets from closed-form
//! theories: mean Keplerian elements for the planets, the equation of centre
//! for the Sun and an abridged lunar series for the Moon. Coordinates are
//! referred to the mean ecliptic and equinox of date (tropical).
//!
//! Accuracy is arc-minute level across 1800–2050, which is what sign,
//! house and dasha work downstream needs.

pub mod error;
pub mod frames;
pub mod kepler;
pub mod lunar;
pub mod solar;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub use error::EngineError;
pub use frames::{
    angle_diff_deg, cartesian_to_spherical, fundamental_arguments,
    general_precession_longitude_deg, mean_obliquity_deg,
};

use kepler::Orbit;

/// Bodies the engine can evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Body {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
}

/// All bodies in evaluation order.
pub const ALL_BODIES: [Body; 7] = [
    Body::Sun,
    Body::Moon,
    Body::Mercury,
    Body::Venus,
    Body::Mars,
    Body::Jupiter,
    Body::Saturn,
];

impl Body {
    const fn orbit(self) -> Option<Orbit> {
        match self {
            Self::Mercury => Some(Orbit::Mercury),
            Self::Venus => Some(Orbit::Venus),
            Self::Mars => Some(Orbit::Mars),
            Self::Jupiter => Some(Orbit::Jupiter),
            Self::Saturn => Some(Orbit::Saturn),
            Self::Sun | Self::Moon => None,
        }
    }
}

/// Engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Convert UT epochs to TT with the ΔT model before evaluation.
    pub apply_delta_t: bool,
    /// Half-width in days of the central difference used for daily motion.
    pub speed_step_days: f64,
    /// Newton correction threshold for Kepler's equation, radians.
    pub kepler_tolerance: f64,
    pub max_kepler_iterations: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            apply_delta_t: true,
            speed_step_days: 0.5,
            kepler_tolerance: 1e-12,
            max_kepler_iterations: 30,
        }
    }
}

impl EngineConfig {
    fn validate(&self) -> Result<(), EngineError> {
        if !(self.speed_step_days.is_finite() && self.speed_step_days > 0.0) {
            return Err(EngineError::InvalidConfig(
                "speed_step_days must be finite and positive",
            ));
        }
        if self.speed_step_days > 5.0 {
            return Err(EngineError::InvalidConfig(
                "speed_step_days must not exceed 5 days",
            ));
        }
        if !(self.kepler_tolerance.is_finite() && self.kepler_tolerance > 0.0) {
            return Err(EngineError::InvalidConfig(
                "kepler_tolerance must be finite and positive",
            ));
        }
        if self.max_kepler_iterations == 0 {
            return Err(EngineError::InvalidConfig(
                "max_kepler_iterations must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// Single position request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Query {
    pub target: Body,
    /// Julian Date, UT.
    pub epoch_jd_ut: f64,
}

/// Geocentric ecliptic-of-date coordinates and daily motion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EclipticState {
    pub longitude_deg: f64,
    pub latitude_deg: f64,
    pub distance_au: f64,
    /// Longitude rate, degrees per day; negative when retrograde.
    pub speed_deg_per_day: f64,
}

impl EclipticState {
    pub fn is_retrograde(&self) -> bool {
        self.speed_deg_per_day < 0.0
    }
}

/// Telemetry from a query or batch of queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QueryStats {
    pub evaluations: u32,
    pub cache_hits: u32,
}

/// Per-request memoization of the Earth–Moon barycentre vector.
///
/// Planet queries at the same TT instant share the Earth position, so a
/// batch at one epoch solves the Earth's orbit once per sample.
struct ComputationContext {
    earth: HashMap<u64, [f64; 3]>,
    evaluations: u32,
    cache_hits: u32,
}

impl ComputationContext {
    fn new() -> Self {
        Self {
            earth: HashMap::with_capacity(4),
            evaluations: 0,
            cache_hits: 0,
        }
    }

    fn stats(&self) -> QueryStats {
        QueryStats {
            evaluations: self.evaluations,
            cache_hits: self.cache_hits,
        }
    }
}

/// Analytic ephemeris engine.
///
/// `Engine` holds only configuration, so it is cheap to clone and is
/// [`Send`] + [`Sync`]; share it across threads freely.
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Evaluate one body at one epoch.
    pub fn query(&self, query: Query) -> Result<EclipticState, EngineError> {
        let mut ctx = ComputationContext::new();
        self.query_with_ctx(query, &mut ctx)
    }

    /// Evaluate a query and return telemetry alongside the result.
    pub fn query_with_stats(&self, query: Query) -> Result<(EclipticState, QueryStats), EngineError> {
        let mut ctx = ComputationContext::new();
        let state = self.query_with_ctx(query, &mut ctx)?;
        Ok((state, ctx.stats()))
    }

    /// Evaluate many queries, sharing memoization. Results are in input order.
    pub fn query_batch(&self, queries: &[Query]) -> Vec<Result<EclipticState, EngineError>> {
        self.query_batch_with_stats(queries).0
    }

    pub fn query_batch_with_stats(
        &self,
        queries: &[Query],
    ) -> (Vec<Result<EclipticState, EngineError>>, QueryStats) {
        let mut ctx = ComputationContext::new();
        let results = queries
            .iter()
            .map(|&q| self.query_with_ctx(q, &mut ctx))
            .collect();
        (results, ctx.stats())
    }

    /// Julian centuries of TT since J2000 for a UT epoch.
    pub fn tt_centuries(&self, jd_ut: f64) -> f64 {
        let jd = if self.config.apply_delta_t {
            dhruv_time::jd_ut_to_tt(jd_ut)
        } else {
            jd_ut
        };
        dhruv_time::jd_to_centuries(jd)
    }

    fn query_with_ctx(
        &self,
        query: Query,
        ctx: &mut ComputationContext,
    ) -> Result<EclipticState, EngineError> {
        if !query.epoch_jd_ut.is_finite() {
            return Err(EngineError::InvalidQuery("epoch_jd_ut must be finite"));
        }

        let h = self.config.speed_step_days;
        let t = self.tt_centuries(query.epoch_jd_ut);
        let dt = h / dhruv_time::DAYS_PER_CENTURY;

        let (lon, lat, dist) = self.position(query.target, t, query.epoch_jd_ut, ctx)?;
        let (lon_before, _, _) = self.position(query.target, t - dt, query.epoch_jd_ut, ctx)?;
        let (lon_after, _, _) = self.position(query.target, t + dt, query.epoch_jd_ut, ctx)?;
        let speed = angle_diff_deg(lon_before, lon_after) / (2.0 * h);

        let state = EclipticState {
            longitude_deg: lon,
            latitude_deg: lat,
            distance_au: dist,
            speed_deg_per_day: speed,
        };
        for (quantity, value) in [
            ("longitude", state.longitude_deg),
            ("latitude", state.latitude_deg),
            ("distance", state.distance_au),
            ("speed", state.speed_deg_per_day),
        ] {
            if !value.is_finite() {
                return Err(EngineError::NonFinite {
                    body: query.target,
                    quantity,
                    epoch_jd: query.epoch_jd_ut,
                });
            }
        }
        Ok(state)
    }

    /// `(lon_deg, lat_deg, dist_au)` of date at TT centuries `t`.
    fn position(
        &self,
        body: Body,
        t: f64,
        epoch_jd: f64,
        ctx: &mut ComputationContext,
    ) -> Result<(f64, f64, f64), EngineError> {
        ctx.evaluations += 1;
        match body {
            Body::Sun => {
                let (lon, r) = solar::sun_position(t);
                Ok((lon, 0.0, r))
            }
            Body::Moon => Ok(lunar::moon_position(t)),
            planet => {
                let orbit = planet
                    .orbit()
                    .ok_or(EngineError::InvalidQuery("body has no orbital elements"))?;
                let no_convergence = || EngineError::NoConvergence {
                    body: planet,
                    epoch_jd,
                };
                let earth = self.earth_position(t, ctx).ok_or_else(no_convergence)?;
                let helio = kepler::heliocentric_position(
                    orbit,
                    t,
                    self.config.kepler_tolerance,
                    self.config.max_kepler_iterations,
                )
                .ok_or_else(no_convergence)?;

                let geo = [
                    helio[0] - earth[0],
                    helio[1] - earth[1],
                    helio[2] - earth[2],
                ];
                let (lon_j2000, lat, dist) = cartesian_to_spherical(geo);
                let lon = (lon_j2000 + general_precession_longitude_deg(t)).rem_euclid(360.0);
                Ok((lon, lat, dist))
            }
        }
    }

    fn earth_position(&self, t: f64, ctx: &mut ComputationContext) -> Option<[f64; 3]> {
        let key = t.to_bits();
        if let Some(cached) = ctx.earth.get(&key) {
            ctx.cache_hits += 1;
            return Some(*cached);
        }
        let p = kepler::heliocentric_position(
            Orbit::EarthMoonBarycenter,
            t,
            self.config.kepler_tolerance,
            self.config.max_kepler_iterations,
        )?;
        ctx.earth.insert(key, p);
        Some(p)
    }
}
