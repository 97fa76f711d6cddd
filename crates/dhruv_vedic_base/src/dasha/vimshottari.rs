//! Vimshottari dasha: the 120-year nakshatra-keyed period cycle.
//!
//! The Moon's nakshatra picks the entry lord; the fraction of the nakshatra
//! already traversed at birth is the fraction of the entry period already
//! elapsed. The first mahadasha therefore starts *before* birth, at its
//! nominal start, so that its sub-periods keep their full proportions.
//! Each level below rotates the same sequence starting at the parent's lord.
//!
//! The same proportional division applied to zodiac arcs gives the KP
//! star lord and sub lord of a longitude.

use serde::Serialize;

use crate::graha::Graha;
use crate::nakshatra::{NAKSHATRA_SPAN_27, nakshatra_from_longitude};
use crate::util::normalize_360;

use super::subperiod::{find_active_period, proportional_children};
use super::types::{DAYS_PER_YEAR, DashaLevel, DashaPeriod, DashaSnapshot, MAX_DASHA_DEPTH};

/// Lords and full periods in years, in cycle order from Ashwini.
pub const VIMSHOTTARI_SEQUENCE: [(Graha, f64); 9] = [
    (Graha::Ketu, 7.0),
    (Graha::Shukra, 20.0),
    (Graha::Surya, 6.0),
    (Graha::Chandra, 10.0),
    (Graha::Mangal, 7.0),
    (Graha::Rahu, 18.0),
    (Graha::Guru, 16.0),
    (Graha::Shani, 19.0),
    (Graha::Buddh, 17.0),
];

/// Length of one full cycle, years.
pub const VIMSHOTTARI_TOTAL_YEARS: f64 = 120.0;

/// Lord of a 0-based nakshatra index.
pub const fn nakshatra_lord(nakshatra_index: u8) -> Graha {
    VIMSHOTTARI_SEQUENCE[(nakshatra_index % 9) as usize].0
}

fn sequence_position(lord: Graha) -> usize {
    VIMSHOTTARI_SEQUENCE
        .iter()
        .position(|(g, _)| *g == lord)
        .unwrap_or(0)
}

/// Sequence rotated to start at `lord`.
fn rotated_from(lord: Graha) -> [(Graha, f64); 9] {
    let start = sequence_position(lord);
    std::array::from_fn(|i| VIMSHOTTARI_SEQUENCE[(start + i) % 9])
}

/// Mahadashas from the entry period's nominal start until at least one full
/// cycle after birth.
pub fn vimshottari_level0(birth_jd: f64, moon_sidereal_lon: f64) -> Vec<DashaPeriod> {
    let moon = nakshatra_from_longitude(moon_sidereal_lon);
    let elapsed = moon.elapsed_fraction;
    let entry = sequence_position(nakshatra_lord(moon.index));
    let entry_days = VIMSHOTTARI_SEQUENCE[entry].1 * DAYS_PER_YEAR;

    let horizon = birth_jd + VIMSHOTTARI_TOTAL_YEARS * DAYS_PER_YEAR;
    let mut cursor = birth_jd - elapsed * entry_days;
    let mut periods = Vec::with_capacity(18);
    let mut offset = 0;

    // Tolerance keeps float drift from adding a spurious extra period.
    while cursor < horizon - 1e-6 {
        let (lord, years) = VIMSHOTTARI_SEQUENCE[(entry + offset) % 9];
        let end = cursor + years * DAYS_PER_YEAR;
        periods.push(DashaPeriod {
            lord,
            start_jd: cursor,
            end_jd: end,
            level: DashaLevel::Mahadasha,
            order: offset as u16 + 1,
        });
        cursor = end;
        offset += 1;
    }

    periods
}

/// All child periods of one parent (empty at the deepest level).
pub fn vimshottari_children(parent: &DashaPeriod) -> Vec<DashaPeriod> {
    match parent.level.child_level() {
        Some(child_level) => proportional_children(
            parent,
            &rotated_from(parent.lord),
            VIMSHOTTARI_TOTAL_YEARS,
            child_level,
        ),
        None => Vec::new(),
    }
}

/// Active periods at `query_jd`, from the mahadasha down to `max_depth`
/// (clamped to the pratyantardasha level).
///
/// Queries before birth yield an empty snapshot.
pub fn vimshottari_snapshot(
    birth_jd: f64,
    moon_sidereal_lon: f64,
    query_jd: f64,
    max_depth: u8,
) -> DashaSnapshot {
    let mut periods = Vec::with_capacity(MAX_DASHA_DEPTH as usize + 1);
    if query_jd >= birth_jd {
        let level0 = vimshottari_level0(birth_jd, moon_sidereal_lon);
        if let Some(idx) = find_active_period(&level0, query_jd) {
            let mut current = level0[idx];
            periods.push(current);
            for _ in 0..max_depth.min(MAX_DASHA_DEPTH) {
                let children = vimshottari_children(&current);
                match find_active_period(&children, query_jd) {
                    Some(i) => {
                        current = children[i];
                        periods.push(current);
                    }
                    None => break,
                }
            }
        }
    }
    DashaSnapshot { query_jd, periods }
}

/// KP star lord and sub lord of a sidereal longitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KpLords {
    pub star_lord: Graha,
    pub sub_lord: Graha,
}

/// Divide the longitude's nakshatra into nine arcs proportional to the
/// Vimshottari years, starting from the nakshatra lord.
pub fn kp_sub_lord(sidereal_lon: f64) -> KpLords {
    let lon = normalize_360(sidereal_lon);
    let nak_idx = ((lon / NAKSHATRA_SPAN_27).floor() as u8).min(26);
    let star_lord = nakshatra_lord(nak_idx);
    let mut remaining = lon - nak_idx as f64 * NAKSHATRA_SPAN_27;

    let rotated = rotated_from(star_lord);
    let mut sub_lord = rotated[8].0;
    for (lord, years) in rotated {
        let arc = years / VIMSHOTTARI_TOTAL_YEARS * NAKSHATRA_SPAN_27;
        if remaining < arc {
            sub_lord = lord;
            break;
        }
        remaining -= arc;
    }

    KpLords {
        star_lord,
        sub_lord,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BIRTH: f64 = 2_451_545.0;

    #[test]
    fn sequence_spans_120_years() {
        let total: f64 = VIMSHOTTARI_SEQUENCE.iter().map(|(_, y)| y).sum();
        assert!((total - VIMSHOTTARI_TOTAL_YEARS).abs() < 1e-12);
    }

    #[test]
    fn ashwini_start_enters_ketu_at_birth() {
        let periods = vimshottari_level0(BIRTH, 0.0);
        assert_eq!(periods[0].lord, Graha::Ketu);
        assert!((periods[0].start_jd - BIRTH).abs() < 1e-9);
        assert!((periods[0].duration_days() / DAYS_PER_YEAR - 7.0).abs() < 1e-9);
        assert_eq!(periods.len(), 9);
    }

    #[test]
    fn mid_rohini_has_half_moon_balance() {
        let lon = 3.0 * NAKSHATRA_SPAN_27 + NAKSHATRA_SPAN_27 / 2.0;
        let periods = vimshottari_level0(BIRTH, lon);
        assert_eq!(periods[0].lord, Graha::Chandra);
        let balance_years = (periods[0].end_jd - BIRTH) / DAYS_PER_YEAR;
        assert!((balance_years - 5.0).abs() < 1e-6, "{balance_years}");
        assert!(periods[0].start_jd < BIRTH);
    }

    #[test]
    fn negative_moon_longitude_wraps_to_revati() {
        // 1° before Mesha 0° is late Revati, ruled by Buddh.
        let level0 = vimshottari_level0(0.0, -1.0);
        assert_eq!(level0[0].lord, Graha::Buddh);
        let left = level0[0].end_jd;
        assert!(left > 0.0 && left < 17.0 * DAYS_PER_YEAR / 10.0, "{left}");
    }

    #[test]
    fn level0_covers_a_full_cycle_after_birth() {
        let periods = vimshottari_level0(BIRTH, 200.0);
        let last = periods.last().map(|p| p.end_jd).unwrap_or(0.0);
        assert!(last >= BIRTH + VIMSHOTTARI_TOTAL_YEARS * DAYS_PER_YEAR - 1e-6);
        for w in periods.windows(2) {
            assert!((w[0].end_jd - w[1].start_jd).abs() < 1e-9);
        }
    }

    #[test]
    fn antardashas_start_with_parent_lord() {
        let periods = vimshottari_level0(BIRTH, 100.0);
        let children = vimshottari_children(&periods[1]);
        assert_eq!(children.len(), 9);
        assert_eq!(children[0].lord, periods[1].lord);
        assert_eq!(children[0].level, DashaLevel::Antardasha);
        assert_eq!(children[8].end_jd, periods[1].end_jd);
    }

    #[test]
    fn snapshot_drills_three_levels() {
        let snap = vimshottari_snapshot(BIRTH, 100.0, BIRTH + 1000.0, 2);
        assert_eq!(snap.periods.len(), 3);
        for p in &snap.periods {
            assert!(p.contains(BIRTH + 1000.0));
        }
        let major = snap.major().map(|p| p.lord);
        let sub_parent_children = vimshottari_children(&snap.periods[0]);
        assert!(sub_parent_children.iter().any(|c| Some(c.lord) == snap.sub().map(|s| s.lord)));
        assert!(major.is_some());
    }

    #[test]
    fn snapshot_before_birth_is_empty() {
        let snap = vimshottari_snapshot(BIRTH, 100.0, BIRTH - 1.0, 2);
        assert!(snap.periods.is_empty());
    }

    #[test]
    fn kp_sub_lord_at_nakshatra_start_is_star_lord() {
        let lords = kp_sub_lord(0.0);
        assert_eq!(lords.star_lord, Graha::Ketu);
        assert_eq!(lords.sub_lord, Graha::Ketu);
    }

    #[test]
    fn kp_sub_lord_second_arc() {
        // Ketu's arc in Ashwini is 7/120 of 13°20′ ≈ 0.7778°.
        let lords = kp_sub_lord(1.0);
        assert_eq!(lords.star_lord, Graha::Ketu);
        assert_eq!(lords.sub_lord, Graha::Shukra);
    }

    #[test]
    fn kp_sub_lord_end_of_zodiac() {
        // Revati is ruled by Mercury; its final arc belongs to Saturn.
        let lords = kp_sub_lord(359.999);
        assert_eq!(lords.star_lord, Graha::Buddh);
        assert_eq!(lords.sub_lord, Graha::Shani);
    }
}
