//! Die pitch estimation from extracted placement coordinates.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::extract::PlacementRecord;

/// Best-guess die repeat distance per axis, in millimeters.
///
/// `None` on an axis means fewer than two distinct coordinate values were
/// available there, or no positive step existed between them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pitch {
    pub x: Option<f64>,
    pub y: Option<f64>,
}

/// Estimate the die pitch along each axis independently.
///
/// This is an advisory heuristic: the most frequent positive step between
/// consecutive distinct coordinates wins. Ties resolve arbitrarily and
/// callers must not rely on their order.
pub fn detect_pitch(coords: &[PlacementRecord]) -> Pitch {
    Pitch {
        x: most_common_step(coords.iter().map(|r| r.x_mm)),
        y: most_common_step(coords.iter().map(|r| r.y_mm)),
    }
}

fn most_common_step(values: impl Iterator<Item = f64>) -> Option<f64> {
    let distinct: HashSet<u64> = values.map(f64::to_bits).collect();
    let mut sorted: Vec<f64> = distinct.into_iter().map(f64::from_bits).collect();
    if sorted.len() < 2 {
        return None;
    }
    sorted.sort_by(f64::total_cmp);

    let mut counts: HashMap<u64, usize> = HashMap::new();
    for pair in sorted.windows(2) {
        let step = pair[1] - pair[0];
        if step > 0.0 {
            *counts.entry(step.to_bits()).or_insert(0) += 1;
        }
    }
    counts
        .into_iter()
        .max_by_key(|&(_, n)| n)
        .map(|(bits, _)| f64::from_bits(bits))
}
