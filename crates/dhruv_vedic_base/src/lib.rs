//! Vedic chart primitives built on core ephemeris outputs.
//!
//! This crate provides:
//! - Graha, rashi and nakshatra classification
//! - Ayanamsha (sidereal offset) for common reference systems
//! - Lunar nodes, lagna/MC and house cusps
//! - Dignity and natural relationship tables
//! - Amsha (divisional chart) longitudes
//! - Vimshottari dasha periods and KP sub lords
//!
//! All implementations are clean-room, derived from public astronomical
//! formulas and classical tables.

pub mod amsha;
pub mod ayanamsha;
pub mod bhava;
pub mod dasha;
pub mod error;
pub mod graha;
pub mod graha_relationships;
pub mod lagna;
pub mod lunar_nodes;
pub mod nakshatra;
pub mod rashi;
pub mod util;

pub use amsha::{ALL_AMSHAS, Amsha, amsha_longitude};
pub use ayanamsha::{AyanamshaSystem, ayanamsha_deg, tropical_to_sidereal};
pub use bhava::{HouseSystem, house_cusps, house_of, is_kendra};
pub use dasha::{
    DashaLevel, DashaPeriod, DashaSnapshot, KpLords, kp_sub_lord, vimshottari_level0,
    vimshottari_snapshot,
};
pub use error::VedicError;
pub use graha::{ALL_GRAHAS, Graha, SAPTA_GRAHAS, rashi_lord, rashi_lord_by_index};
pub use graha_relationships::{
    BeneficNature, Dignity, NaisargikaMaitri, debilitation_degree, dignity,
    distance_from_exaltation, exaltation_degree, naisargika_maitri, natural_benefic_malefic,
    own_signs,
};
pub use lagna::{GeoLocation, lagna_and_mc, lagna_and_mc_from_lst};
pub use lunar_nodes::{LunarNode, NodeMode, lunar_node_deg};
pub use nakshatra::{NAKSHATRA_SPAN_27, NakshatraInfo, nakshatra_from_longitude};
pub use rashi::{
    ALL_RASHIS, Rashi, RashiElement, RashiInfo, SignType, rashi_element, rashi_from_longitude,
    sign_type,
};
pub use util::{angular_separation, normalize_360, rashi_index_of};
