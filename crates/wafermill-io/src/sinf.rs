//! SINF/KLA wafer-map serialization.
//!
//! The wafer-map document is a fixed sequence of header lines, an
//! optional bin-definition table, and one line per grid row with every
//! cell rendered as a double-quoted single-character symbol. The target
//! reader ecosystem consumes Latin-1 bytes only; header and bin lines
//! always terminate with CRLF, and the selected line mode governs the
//! grid rows (the SINF convention appends a quoted-CR field before its
//! CRLF, i.e. the `22 0d 22 0d 0a` tail the product reader requires).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use wafermill_core::DieGrid;

/// Line-termination convention for grid rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineMode {
    /// Quoted-CR field plus CRLF, as required by the product reader.
    #[default]
    Sinf,
    /// Windows line endings.
    Crlf,
    /// Unix line endings.
    Lf,
}

/// Everything the formatter needs to emit one wafer-map document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaferMapDocument {
    pub wafer_id: String,
    pub diameter_mm: f64,
    /// Number of placement records, as displayed by downstream tooling.
    pub die_count: usize,
    pub grid: DieGrid,
    /// Pre-formatted bin-definition lines, emitted verbatim.
    pub bin_rows: Vec<String>,
    pub line_mode: LineMode,
}

#[derive(Error, Debug)]
pub enum SinfError {
    #[error("character {ch:?} (U+{code:04X}) cannot be encoded as Latin-1")]
    NonLatin1 { ch: char, code: u32 },
}

// Literal header lines between the geometry line and the die-count line.
const HEADER_MID: [&str; 13] = [
    r#""44","4""#,
    r#""0""#,
    r#""1","4""#,
    r#""POST""#,
    "0",
    "0",
    "0",
    r#""FALSE""#,
    "0",
    "0",
    r#""FALSE""#,
    r#""0""#,
    r#""0""#,
];

// Literal header lines following the die-count line.
const HEADER_TAIL: [&str; 9] = [
    r#""RVD","RVD","RVD""#,
    r#""FALSE""#,
    r#""""#,
    r#""0""#,
    r#""100:6""#,
    r#""RVD","RVD","RVD","RVD","RVD","RVD","RVD","RVD","RVD","RVD","RVD""#,
    r#""""#,
    r#""""#,
    r#""RVD","RVD","RVD","RVD","RVD","RVD","RVD","RVD","RVD","RVD","RVD","RVD","RVD","RVD""#,
];

/// Serialize a wafer-map document into its byte-exact external form.
///
/// The only failure mode is a character outside the Latin-1 range in the
/// wafer id or a bin row; grid symbols are always ASCII.
pub fn format_map(doc: &WaferMapDocument) -> Result<Vec<u8>, SinfError> {
    let rows = doc.grid.row_count();
    let cols = doc.grid.col_count();
    let diam = doc.diameter_mm;

    let mut out = Vec::new();
    let geometry = format!(
        "\"{id}\",6,\"METRIC\",\"BOTTOM\",\"{diam}\",\"{diam}\",{rows},{cols},\"0\",\"0\"",
        id = doc.wafer_id,
    );
    push_line(&mut out, &geometry)?;
    for line in HEADER_MID {
        push_line(&mut out, line)?;
    }
    push_line(&mut out, &format!("\"{}\"", doc.die_count))?;
    for line in HEADER_TAIL {
        push_line(&mut out, line)?;
    }
    if !doc.bin_rows.is_empty() {
        push_line(&mut out, &format!("\"{}\"", doc.bin_rows.len()))?;
        for bin in &doc.bin_rows {
            push_line(&mut out, bin)?;
        }
    }

    for row in &doc.grid.rows {
        let mut cells = String::with_capacity(row.len() * 4);
        for (i, cell) in row.iter().enumerate() {
            if i > 0 {
                cells.push(',');
            }
            cells.push('"');
            cells.push(cell.symbol());
            cells.push('"');
        }
        push_latin1(&mut out, &cells)?;
        match doc.line_mode {
            LineMode::Sinf => out.extend_from_slice(b",\"\r\"\r\n"),
            LineMode::Crlf => out.extend_from_slice(b"\r\n"),
            LineMode::Lf => out.push(b'\n'),
        }
    }

    log::debug!(
        "Formatted {rows}x{cols} map with {} bin rows, {} bytes",
        doc.bin_rows.len(),
        out.len()
    );
    Ok(out)
}

fn push_line(out: &mut Vec<u8>, line: &str) -> Result<(), SinfError> {
    push_latin1(out, line)?;
    out.extend_from_slice(b"\r\n");
    Ok(())
}

/// Append `text` one byte per character. Code points above U+00FF have no
/// Latin-1 representation and are rejected.
fn push_latin1(out: &mut Vec<u8>, text: &str) -> Result<(), SinfError> {
    for ch in text.chars() {
        let code = ch as u32;
        if code > 0xFF {
            return Err(SinfError::NonLatin1 { ch, code });
        }
        out.push(code as u8);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wafermill_core::build_grid;

    fn doc(line_mode: LineMode, bin_rows: Vec<String>) -> WaferMapDocument {
        WaferMapDocument {
            wafer_id: "LOT42_W07".to_string(),
            diameter_mm: 147.3,
            die_count: 9,
            grid: build_grid(&[], 4.0, 1.0, 1.0, false),
            bin_rows,
            line_mode,
        }
    }

    fn lines(bytes: &[u8]) -> Vec<String> {
        String::from_utf8(bytes.to_vec())
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_geometry_line_layout() {
        let out = format_map(&doc(LineMode::Crlf, Vec::new())).unwrap();
        let lines = lines(&out);
        assert_eq!(
            lines[0],
            "\"LOT42_W07\",6,\"METRIC\",\"BOTTOM\",\"147.3\",\"147.3\",7,7,\"0\",\"0\""
        );
        assert_eq!(lines[1], "\"44\",\"4\"");
        assert_eq!(lines[4], "\"POST\"");
        assert_eq!(lines[14], "\"9\"");
        assert_eq!(lines[19], "\"100:6\"");
        // 24 header lines followed by the 7 grid rows.
        assert_eq!(lines.len(), 24 + 7);
        assert_eq!(lines[24], "\".\",\".\",\".\",\".\",\".\",\".\",\".\"");
    }

    #[test]
    fn test_bin_rows_emitted_verbatim() {
        let bins = vec![
            "\"1\",\"PASS\",\"\",\"0\",\"0\",\"PASS\",65280,\"0\",\"0\",\"False\"".to_string(),
            "\"5\",\"LEAKAGE 1\",\"\",\"\",\"\",\"FAIL\",16777088,\"\",\"\",\"False\"".to_string(),
        ];
        let out = format_map(&doc(LineMode::Crlf, bins.clone())).unwrap();
        let lines = lines(&out);
        assert_eq!(lines[24], "\"2\"");
        assert_eq!(lines[25], bins[0]);
        assert_eq!(lines[26], bins[1]);
    }

    #[test]
    fn test_sinf_rows_carry_quoted_cr() {
        let out = format_map(&doc(LineMode::Sinf, Vec::new())).unwrap();
        // Every grid row ends with `","` CR `"` CRLF; headers stay CRLF.
        assert!(out.ends_with(b",\"\r\"\r\n"));
        // 7 cells of `"x",` minus one comma, plus the 6-byte SINF tail.
        let row_len = (7 * 4 - 1) + 6;
        let grid_tail = &out[out.len() - 7 * row_len..];
        assert_eq!(grid_tail.iter().filter(|&&b| b == b'\n').count(), 7);
        assert!(grid_tail.starts_with(b"\".\","));
    }

    #[test]
    fn test_lf_mode_affects_only_grid_rows() {
        let out = format_map(&doc(LineMode::Lf, Vec::new())).unwrap();
        let text: String = out.iter().map(|&b| b as char).collect();
        let mut it = text.split_inclusive('\n');
        for _ in 0..24 {
            assert!(it.next().unwrap().ends_with("\r\n"));
        }
        for row in it {
            assert!(row.ends_with('\n'));
            assert!(!row.ends_with("\r\n"));
        }
    }

    #[test]
    fn test_latin1_passthrough_and_rejection() {
        let mut d = doc(LineMode::Crlf, Vec::new());
        d.wafer_id = "LOT\u{e9}".to_string();
        let out = format_map(&d).unwrap();
        assert_eq!(out[4], 0xE9);

        d.wafer_id = "LOT\u{20ac}".to_string();
        match format_map(&d) {
            Err(SinfError::NonLatin1 { code, .. }) => assert_eq!(code, 0x20AC),
            other => panic!("expected NonLatin1, got {other:?}"),
        }
    }
}
