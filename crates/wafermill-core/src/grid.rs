//! Radial die-grid construction.
//!
//! Placement coordinates are snapped to die-pitch indices and classified
//! against the circular wafer outline. The resulting grid is the minimal
//! bounding rectangle of all on-wafer dies plus a one-cell margin on every
//! side, ordered north-to-south by row and west-to-east by column.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::extract::PlacementRecord;

/// Classification of one die-sized cell.
///
/// `Empty` and `Outside` render as the same `.` symbol in the wafer-map
/// format, but they stay distinct internally: the edge computation must
/// not treat an off-wafer neighbor as an unoccupied in-wafer site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GridCell {
    /// A die sits here.
    Occupied,
    /// Unoccupied in-wafer cell adjacent to a die.
    Edge,
    /// Unoccupied cell inside the wafer outline.
    Empty,
    /// Cell whose nominal center lies outside the wafer outline.
    Outside,
}

impl GridCell {
    /// The single-character symbol this cell renders as in the wafer-map
    /// format. `Empty` and `Outside` collapse to `.`.
    pub fn symbol(self) -> char {
        match self {
            GridCell::Occupied => '?',
            GridCell::Edge => '*',
            GridCell::Empty | GridCell::Outside => '.',
        }
    }
}

/// A rectangular grid of classified die cells.
///
/// Rows run north-to-south, columns west-to-east. [`build_grid`] always
/// produces rows of identical length; a grid recovered from hand-edited
/// map text may be ragged, and `col_count` then reports the first row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DieGrid {
    pub rows: Vec<Vec<GridCell>>,
}

impl DieGrid {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn col_count(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    pub fn occupied_count(&self) -> usize {
        self.rows
            .iter()
            .flatten()
            .filter(|&&c| c == GridCell::Occupied)
            .count()
    }

    /// Render each row as its bare symbol string (no quoting, no commas).
    pub fn symbol_rows(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|c| c.symbol()).collect())
            .collect()
    }
}

const NEIGHBORS: [(i64, i64); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Build the die grid for a wafer of the given diameter.
///
/// `die_x_mm` and `die_y_mm` must be positive; they divide the placement
/// coordinates. A coordinate counts as a die when the nominal center of
/// its snapped grid index lies within the wafer radius — the distance is
/// re-derived from the rounded index, not the original coordinate, so a
/// die near the outline can fall either way. With no on-wafer dies at all
/// the grid falls back to a centered square wide enough to show the whole
/// wafer.
pub fn build_grid(
    coords: &[PlacementRecord],
    diameter_mm: f64,
    die_x_mm: f64,
    die_y_mm: f64,
    show_edge: bool,
) -> DieGrid {
    let radius = diameter_mm / 2.0;

    let mut occupied: HashSet<(i64, i64)> = HashSet::new();
    let mut bounds: Option<(i64, i64, i64, i64)> = None;
    for rec in coords {
        let gx = (rec.x_mm / die_x_mm).round() as i64;
        let gy = (rec.y_mm / die_y_mm).round() as i64;
        if center_distance(gx, gy, die_x_mm, die_y_mm) <= radius {
            occupied.insert((gx, gy));
            bounds = Some(match bounds {
                None => (gx, gx, gy, gy),
                Some((lo_x, hi_x, lo_y, hi_y)) => {
                    (lo_x.min(gx), hi_x.max(gx), lo_y.min(gy), hi_y.max(gy))
                }
            });
        }
    }

    // Bounding rectangle of the occupied indices plus one cell of margin;
    // without any dies, a centered square covering the wafer outline.
    let (min_gx, max_gx, min_gy, max_gy) = match bounds {
        Some((lo_x, hi_x, lo_y, hi_y)) => (lo_x - 1, hi_x + 1, lo_y - 1, hi_y + 1),
        None => {
            let half_width = (radius / die_x_mm.min(die_y_mm)).ceil() as i64 + 1;
            (-half_width, half_width, -half_width, half_width)
        }
    };

    let mut rows = Vec::with_capacity((max_gy - min_gy + 1) as usize);
    for gy in (min_gy..=max_gy).rev() {
        let mut row = Vec::with_capacity((max_gx - min_gx + 1) as usize);
        for gx in min_gx..=max_gx {
            let cell = if center_distance(gx, gy, die_x_mm, die_y_mm) > radius {
                GridCell::Outside
            } else if occupied.contains(&(gx, gy)) {
                GridCell::Occupied
            } else if show_edge
                && NEIGHBORS
                    .iter()
                    .any(|&(dx, dy)| occupied.contains(&(gx + dx, gy + dy)))
            {
                GridCell::Edge
            } else {
                GridCell::Empty
            };
            row.push(cell);
        }
        rows.push(row);
    }

    log::debug!(
        "Built {}x{} grid, {} dies on wafer",
        rows.len(),
        rows.first().map_or(0, Vec::len),
        occupied.len()
    );
    DieGrid { rows }
}

/// Euclidean distance from the wafer origin to the nominal center of grid
/// index `(gx, gy)`.
fn center_distance(gx: i64, gy: i64, die_x_mm: f64, die_y_mm: f64) -> f64 {
    let cx = gx as f64 * die_x_mm;
    let cy = gy as f64 * die_y_mm;
    (cx.powi(2) + cy.powi(2)).sqrt()
}
