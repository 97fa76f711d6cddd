//! Lunar node (Rahu/Ketu) longitude computation.
//!
//! Mean node: the fifth Delaunay argument Ω. True node: mean plus the
//! short-period terms of Meeus, *Astronomical Algorithms* (2nd ed.), Ch. 47.
//! Ketu is always Rahu + 180°.

use dhruv_core::fundamental_arguments;
use serde::{Deserialize, Serialize};

use crate::util::normalize_360;

/// Which lunar node to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LunarNode {
    Rahu,
    Ketu,
}

/// Mean or true (perturbed) node position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeMode {
    #[default]
    Mean,
    True,
}

/// `[nl, nl', nF, nD, nΩ, amplitude_deg]`.
#[rustfmt::skip]
const PERTURBATIONS: [[f64; 6]; 8] = [
    [ 0.0,  0.0,  0.0,  0.0,  1.0, -1.4979],
    [ 0.0,  0.0,  2.0, -2.0,  0.0,  0.1500],
    [ 0.0,  0.0,  2.0,  0.0,  0.0, -0.1226],
    [ 0.0,  0.0,  0.0,  0.0,  2.0,  0.1176],
    [ 1.0,  0.0,  0.0,  0.0,  0.0, -0.0801],
    [ 0.0,  1.0,  0.0,  0.0,  0.0,  0.0056],
    [ 0.0,  0.0,  2.0,  0.0, -2.0, -0.0047],
    [ 1.0,  0.0,  2.0,  0.0,  0.0, -0.0043],
];

/// Tropical longitude of a node in degrees [0, 360). `t` = TT centuries.
pub fn lunar_node_deg(node: LunarNode, t: f64, mode: NodeMode) -> f64 {
    let args = fundamental_arguments(t);
    let mut rahu = args[4].to_degrees();
    if mode == NodeMode::True {
        rahu += PERTURBATIONS
            .iter()
            .map(|term| {
                let angle: f64 = (0..5).map(|i| term[i] * args[i]).sum();
                term[5] * angle.sin()
            })
            .sum::<f64>();
    }
    match node {
        LunarNode::Rahu => normalize_360(rahu),
        LunarNode::Ketu => normalize_360(rahu + 180.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_rahu_at_j2000() {
        let r = lunar_node_deg(LunarNode::Rahu, 0.0, NodeMode::Mean);
        assert!((r - 125.0446).abs() < 0.001, "rahu = {r}");
    }

    #[test]
    fn ketu_opposite_rahu() {
        for &t in &[-0.5, 0.0, 0.3] {
            for mode in [NodeMode::Mean, NodeMode::True] {
                let r = lunar_node_deg(LunarNode::Rahu, t, mode);
                let k = lunar_node_deg(LunarNode::Ketu, t, mode);
                assert!((normalize_360(k - r) - 180.0).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn node_regresses() {
        let a = lunar_node_deg(LunarNode::Rahu, 0.0, NodeMode::Mean);
        let b = lunar_node_deg(LunarNode::Rahu, 0.01, NodeMode::Mean);
        // ~ −19.34° per year
        let d = normalize_360(b - a + 180.0) - 180.0;
        assert!((d + 19.34).abs() < 0.05, "delta = {d}");
    }

    #[test]
    fn true_node_within_two_degrees_of_mean() {
        for i in 0..100 {
            let t = -0.2 + i as f64 * 0.004;
            let m = lunar_node_deg(LunarNode::Rahu, t, NodeMode::Mean);
            let tr = lunar_node_deg(LunarNode::Rahu, t, NodeMode::True);
            let d = (normalize_360(tr - m + 180.0) - 180.0).abs();
            assert!(d < 2.0, "delta = {d}");
        }
    }
}
