//! Heuristic reverse parser for wafer-map text.
//!
//! The live edit loop hands the whole document body back after every
//! quiescent pause in typing, so this parser is best-effort by contract:
//! it locates the row-data section without understanding the header, and
//! a body with no recognizable section is an absent result, never an
//! error. A malformed row embedded mid-data is silently skipped — known
//! limitation, the surrounding rows still parse.

use wafermill_core::{DieGrid, GridCell};

/// Minimum number of `","`-separated parts a line must have before it can
/// open the data section. Keeps short quoted header lines from
/// masquerading as one-row maps.
const MIN_DATA_PARTS: usize = 10;

/// Reconstruct a die grid from a formatted or hand-edited wafer-map body.
///
/// Returns `None` when no data section is recognized. Rows are not
/// equalized in length; a ragged edit parses as a ragged grid. The `.`
/// symbol reconstructs as [`GridCell::Empty`] — the wafer outline is
/// unknown at this boundary, so outside-wafer cells are indistinguishable
/// from interior empties.
pub fn reparse(text: &str) -> Option<DieGrid> {
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.iter().position(|line| is_data_start(line))?;

    let mut rows = Vec::new();
    for line in &lines[start..] {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(row) = parse_row(line) {
            rows.push(row);
        }
    }

    if rows.is_empty() {
        None
    } else {
        Some(DieGrid { rows })
    }
}

fn cell_for(symbol: &str) -> Option<GridCell> {
    match symbol {
        "?" => Some(GridCell::Occupied),
        "*" => Some(GridCell::Edge),
        "." => Some(GridCell::Empty),
        _ => None,
    }
}

/// Quote-and-whitespace-strip one `","`-separated part down to its cell
/// content.
fn strip_cell(part: &str) -> &str {
    part.trim().trim_matches('"')
}

fn is_data_start(line: &str) -> bool {
    let line = line.trim();
    if line.is_empty() {
        return false;
    }
    let parts: Vec<&str> = line.split("\",\"").collect();
    if parts.len() < MIN_DATA_PARTS {
        return false;
    }
    parts
        .iter()
        .map(|p| strip_cell(p))
        .all(|c| c.is_empty() || cell_for(c).is_some())
}

/// Accept a line as a grid row only if every non-empty cell is a map
/// symbol; empty cells are dropped rather than kept as a fourth state.
fn parse_row(line: &str) -> Option<Vec<GridCell>> {
    let mut row = Vec::new();
    for part in line.split("\",\"") {
        let cell = strip_cell(part);
        if cell.is_empty() {
            continue;
        }
        row.push(cell_for(cell)?);
    }
    if row.is_empty() {
        None
    } else {
        Some(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sinf::{format_map, LineMode, WaferMapDocument};
    use wafermill_core::build_grid;

    fn map_text(line_mode: LineMode) -> (DieGrid, String) {
        // A wafer wide enough that rows clear the detection threshold.
        let coords: Vec<_> = (-5..=5)
            .flat_map(|gx| (-5..=5).map(move |gy| (gx as f64, gy as f64)))
            .map(|(x_mm, y_mm)| wafermill_core::PlacementRecord {
                x_mm,
                y_mm,
                structure: "die".to_string(),
            })
            .collect();
        let grid = build_grid(&coords, 11.0, 1.0, 1.0, true);
        let doc = WaferMapDocument {
            wafer_id: "RT".to_string(),
            diameter_mm: 11.0,
            die_count: coords.len(),
            grid: grid.clone(),
            bin_rows: vec!["\"1\",\"PASS\",\"\",\"0\",\"0\",\"PASS\",65280,\"0\",\"0\",\"False\"".to_string()],
            line_mode,
        };
        let bytes = format_map(&doc).unwrap();
        let text = bytes.iter().map(|&b| b as char).collect();
        (grid, text)
    }

    #[test]
    fn test_round_trip_all_line_modes() {
        for mode in [LineMode::Sinf, LineMode::Crlf, LineMode::Lf] {
            let (grid, text) = map_text(mode);
            let parsed = reparse(&text).unwrap();
            assert_eq!(parsed.row_count(), grid.row_count());
            assert_eq!(parsed.col_count(), grid.col_count());
            assert_eq!(parsed.symbol_rows(), grid.symbol_rows());
        }
    }

    #[test]
    fn test_no_data_section() {
        assert!(reparse("").is_none());
        assert!(reparse("\"44\",\"4\"\r\n\"POST\"\r\n0\r\n").is_none());
        // Symbol rows below the width threshold are not a data section.
        assert!(reparse("\".\",\"?\",\".\"\n\".\",\"?\",\".\"\n").is_none());
    }

    #[test]
    fn test_header_lines_never_match() {
        let (_, text) = map_text(LineMode::Crlf);
        let parsed = reparse(&text).unwrap();
        // The RVD header lines and the bin row split into >= 10 parts but
        // their cells are not map symbols, so the section starts at the
        // first real grid row.
        assert!(parsed
            .rows
            .iter()
            .flatten()
            .all(|&c| matches!(c, GridCell::Occupied | GridCell::Edge | GridCell::Empty)));
    }

    #[test]
    fn test_malformed_interior_row_skipped() {
        let good = "\".\",\".\",\"?\",\"?\",\"?\",\"?\",\"?\",\"?\",\".\",\".\"";
        let bad = "\".\",\".\",\"x\",\"?\",\"?\",\"?\",\"?\",\"?\",\".\",\".\"";
        let text = format!("{good}\n{bad}\n{good}\n");
        let parsed = reparse(&text).unwrap();
        assert_eq!(parsed.row_count(), 2);
    }

    #[test]
    fn test_ragged_rows_preserved() {
        let wide = "\".\",\".\",\".\",\"?\",\"?\",\"?\",\"?\",\".\",\".\",\".\"";
        let narrow = "\"?\",\"?\",\"?\"";
        let text = format!("{wide}\n\n{narrow}\n");
        let parsed = reparse(&text).unwrap();
        assert_eq!(parsed.row_count(), 2);
        assert_eq!(parsed.rows[0].len(), 10);
        assert_eq!(parsed.rows[1].len(), 3);
    }

    #[test]
    fn test_data_section_on_first_line() {
        let row = "\"?\",\"?\",\"?\",\"?\",\"?\",\"?\",\"?\",\"?\",\"?\",\"?\"";
        let parsed = reparse(row).unwrap();
        assert_eq!(parsed.row_count(), 1);
        assert_eq!(parsed.occupied_count(), 10);
    }
}
