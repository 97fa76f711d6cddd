//! Vimshottari dasha (planetary period) calculations.
//!
//! Level-0 generation from the Moon's birth nakshatra, proportional
//! sub-periods and a snapshot path that materializes only the chain of
//! active periods at a query instant.

pub mod subperiod;
pub mod types;
pub mod vimshottari;

pub use subperiod::{find_active_period, proportional_children, snap_last_child_end};
pub use types::{DAYS_PER_YEAR, DashaLevel, DashaPeriod, DashaSnapshot, MAX_DASHA_DEPTH};
pub use vimshottari::{
    KpLords, VIMSHOTTARI_SEQUENCE, VIMSHOTTARI_TOTAL_YEARS, kp_sub_lord, nakshatra_lord,
    vimshottari_children, vimshottari_level0, vimshottari_snapshot,
};
