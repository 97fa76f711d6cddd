//! Core types for Vimshottari dasha (planetary period) calculations.

use serde::Serialize;

use crate::graha::Graha;

/// Year length used for dasha period arithmetic.
pub const DAYS_PER_YEAR: f64 = 365.25;

/// Deepest level the snapshot drill-down reaches.
pub const MAX_DASHA_DEPTH: u8 = 2;

/// Hierarchical dasha levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum DashaLevel {
    Mahadasha = 0,
    Antardasha = 1,
    Pratyantardasha = 2,
}

impl DashaLevel {
    /// Next deeper level, if any.
    pub const fn child_level(self) -> Option<Self> {
        match self {
            Self::Mahadasha => Some(Self::Antardasha),
            Self::Antardasha => Some(Self::Pratyantardasha),
            Self::Pratyantardasha => None,
        }
    }
}

/// A single dasha period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DashaPeriod {
    /// Ruling graha.
    pub lord: Graha,
    /// JD UT, inclusive.
    pub start_jd: f64,
    /// JD UT, exclusive.
    pub end_jd: f64,
    pub level: DashaLevel,
    /// 1-indexed position among siblings.
    pub order: u16,
}

impl DashaPeriod {
    pub fn duration_days(&self) -> f64 {
        self.end_jd - self.start_jd
    }

    /// Half-open containment `[start, end)`.
    pub fn contains(&self, jd: f64) -> bool {
        self.start_jd <= jd && jd < self.end_jd
    }
}

/// Active periods at one instant, outermost first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashaSnapshot {
    pub query_jd: f64,
    pub periods: Vec<DashaPeriod>,
}

impl DashaSnapshot {
    pub fn major(&self) -> Option<&DashaPeriod> {
        self.periods.first()
    }

    pub fn sub(&self) -> Option<&DashaPeriod> {
        self.periods.get(1)
    }

    pub fn sub_sub(&self) -> Option<&DashaPeriod> {
        self.periods.get(2)
    }
}
