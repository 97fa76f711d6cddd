//! Proportional sub-period generation and active-period lookup.

use crate::graha::Graha;

use super::types::{DashaLevel, DashaPeriod};

/// Snap the last child's end to the parent's end to absorb floating-point drift.
pub fn snap_last_child_end(children: &mut [DashaPeriod], parent_end_jd: f64) {
    if let Some(last) = children.last_mut() {
        last.end_jd = parent_end_jd;
    }
}

/// Children of `parent`, each lasting `full_period / total * parent_duration`.
///
/// `sequence` is already rotated so that its first entry rules the first child.
pub fn proportional_children(
    parent: &DashaPeriod,
    sequence: &[(Graha, f64)],
    total_period: f64,
    child_level: DashaLevel,
) -> Vec<DashaPeriod> {
    let parent_duration = parent.duration_days();
    let mut children = Vec::with_capacity(sequence.len());
    let mut cursor = parent.start_jd;

    for (i, &(lord, full_period)) in sequence.iter().enumerate() {
        let end = cursor + full_period / total_period * parent_duration;
        children.push(DashaPeriod {
            lord,
            start_jd: cursor,
            end_jd: end,
            level: child_level,
            order: i as u16 + 1,
        });
        cursor = end;
    }

    snap_last_child_end(&mut children, parent.end_jd);
    children
}

/// Index of the period containing `jd`, assuming contiguous ascending periods.
pub fn find_active_period(periods: &[DashaPeriod], jd: f64) -> Option<usize> {
    let idx = periods.partition_point(|p| p.end_jd <= jd);
    periods.get(idx).filter(|p| p.contains(jd)).map(|_| idx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parent(start: f64, len: f64) -> DashaPeriod {
        DashaPeriod {
            lord: Graha::Ketu,
            start_jd: start,
            end_jd: start + len,
            level: DashaLevel::Mahadasha,
            order: 1,
        }
    }

    #[test]
    fn children_tile_the_parent() {
        let p = parent(2_451_545.0, 400.0);
        let seq = [(Graha::Ketu, 100.0), (Graha::Shukra, 200.0), (Graha::Surya, 100.0)];
        let children = proportional_children(&p, &seq, 400.0, DashaLevel::Antardasha);
        assert_eq!(children.len(), 3);
        assert!((children[0].start_jd - p.start_jd).abs() < 1e-10);
        assert!((children[1].duration_days() - 200.0).abs() < 1e-9);
        assert_eq!(children[2].end_jd, p.end_jd);
        for w in children.windows(2) {
            assert_eq!(w[0].end_jd, w[1].start_jd);
        }
    }

    #[test]
    fn active_lookup_respects_bounds() {
        let p = parent(0.0, 30.0);
        let seq = [(Graha::Ketu, 1.0), (Graha::Shukra, 1.0), (Graha::Surya, 1.0)];
        let children = proportional_children(&p, &seq, 3.0, DashaLevel::Antardasha);
        assert_eq!(find_active_period(&children, 0.0), Some(0));
        assert_eq!(find_active_period(&children, 10.0), Some(1));
        assert_eq!(find_active_period(&children, 29.9), Some(2));
        assert_eq!(find_active_period(&children, 30.0), None);
        assert_eq!(find_active_period(&children, -0.1), None);
    }
}
