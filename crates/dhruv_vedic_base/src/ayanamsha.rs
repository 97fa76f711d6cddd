//! Ayanamsha: the offset between the tropical and a sidereal zodiac.
//!
//! Each system is fixed by its value at J2000.0; the value at any other
//! epoch adds the IAU 2006 general precession in longitude.

use dhruv_core::general_precession_longitude_deg;
use serde::{Deserialize, Serialize};

use crate::util::normalize_360;

/// Sidereal reference systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AyanamshaSystem {
    /// Lahiri (Chitrapaksha): Spica at 0° Libra sidereal.
    #[default]
    Lahiri,
    /// Krishnamurti Paddhati, minimal offset from Lahiri.
    Kp,
    /// B.V. Raman, zero year approximately 397 CE.
    Raman,
    /// Fagan-Bradley Synetic Vernal Point.
    FaganBradley,
    /// Sri Yukteshwar, "The Holy Science".
    Yukteshwar,
    /// Surya Siddhanta, back-computed with IAU precession.
    SuryaSiddhanta,
}

const ALL_SYSTEMS: [AyanamshaSystem; 6] = [
    AyanamshaSystem::Lahiri,
    AyanamshaSystem::Kp,
    AyanamshaSystem::Raman,
    AyanamshaSystem::FaganBradley,
    AyanamshaSystem::Yukteshwar,
    AyanamshaSystem::SuryaSiddhanta,
];

impl AyanamshaSystem {
    /// Reference ayanamsha at J2000.0 in degrees.
    pub const fn reference_j2000_deg(self) -> f64 {
        match self {
            Self::Lahiri => 23.853,
            Self::Kp => 23.850,
            Self::Raman => 22.370,
            Self::FaganBradley => 24.736,
            Self::Yukteshwar => 22.376,
            Self::SuryaSiddhanta => 22.459,
        }
    }

    pub const fn all() -> &'static [AyanamshaSystem] {
        &ALL_SYSTEMS
    }
}

/// Mean ayanamsha in degrees. `t_centuries` = TT centuries since J2000.0.
pub fn ayanamsha_deg(system: AyanamshaSystem, t_centuries: f64) -> f64 {
    system.reference_j2000_deg() + general_precession_longitude_deg(t_centuries)
}

/// Tropical longitude → sidereal longitude in [0, 360).
pub fn tropical_to_sidereal(tropical_lon_deg: f64, system: AyanamshaSystem, t_centuries: f64) -> f64 {
    normalize_360(tropical_lon_deg - ayanamsha_deg(system, t_centuries))
}
