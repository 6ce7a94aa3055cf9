//! Structure-placement extraction from GDS2 ASCII listings.
//!
//! A GDS2 listing is a textual dump of a layout database, one keyword per
//! line. Only the four records that describe structure references matter
//! here: `SREF` opens a block, `SNAME` names the placed sub-structure,
//! `XY` carries its placement coordinate, `ENDEL` closes the block.
//! Coordinates are database units (nanometers) and are converted to
//! millimeters on extraction.

use serde::{Deserialize, Serialize};

/// One structure placement pulled out of a listing.
///
/// Records keep the order in which they appear in the source text and are
/// never deduplicated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementRecord {
    pub x_mm: f64,
    pub y_mm: f64,
    pub structure: String,
}

/// Scanner state while walking the listing line by line.
///
/// An `XY` record can only produce a placement while inside an SREF block
/// that has already seen an `SNAME`; the enum makes the illegal
/// combinations unrepresentable.
enum ScanState {
    Outside,
    InsideBlock { name: Option<String> },
}

/// Extract placement coordinates for named structures from a GDS2 listing.
///
/// An empty `filter` accepts every structure name; otherwise only records
/// whose `SNAME` is a member of the filter are emitted. Malformed blocks
/// never fail the scan — they simply contribute no records.
pub fn extract(text: &str, filter: &[String]) -> Vec<PlacementRecord> {
    let mut state = ScanState::Outside;
    let mut records = Vec::new();

    for raw in text.lines() {
        let line = raw.trim();
        if line == "SREF" {
            state = ScanState::InsideBlock { name: None };
            continue;
        }
        let name = match &mut state {
            ScanState::Outside => continue,
            ScanState::InsideBlock { name } => name,
        };
        if let Some(sname) = parse_sname(line) {
            *name = Some(sname.to_string());
        } else if let Some((x, y)) = parse_xy(line) {
            if let Some(n) = name.as_deref() {
                if filter.is_empty() || filter.iter().any(|f| f == n) {
                    records.push(PlacementRecord {
                        x_mm: x / 1_000_000.0,
                        y_mm: y / 1_000_000.0,
                        structure: n.to_string(),
                    });
                }
            }
        } else if line == "ENDEL" {
            state = ScanState::Outside;
        }
    }

    log::debug!("Extracted {} placement records", records.len());
    records
}

/// Match `SNAME <name>`; the remainder after the keyword is the name,
/// taken verbatim.
fn parse_sname(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("SNAME")?;
    let name = rest.trim_start();
    if name.len() == rest.len() || name.is_empty() {
        return None;
    }
    Some(name)
}

/// Match `XY <num>:<num>` and return the first coordinate pair. Any extra
/// pairs or trailing content on the line are ignored.
fn parse_xy(line: &str) -> Option<(f64, f64)> {
    let rest = line.strip_prefix("XY")?;
    let after_ws = rest.trim_start();
    if after_ws.len() == rest.len() {
        // Keyword must be followed by whitespace
        return None;
    }
    let (x, rest) = lex_number(after_ws)?;
    let rest = rest.trim_start().strip_prefix(':')?;
    let (y, _) = lex_number(rest.trim_start())?;
    Some((x, y))
}

/// Lex an optionally signed, optionally fractional decimal number off the
/// front of `s`, returning the value and the unconsumed remainder.
fn lex_number(s: &str) -> Option<(f64, &str)> {
    let bytes = s.as_bytes();
    let mut end = 0;
    if bytes.first() == Some(&b'-') {
        end += 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return None;
    }
    if bytes.get(end) == Some(&b'.') {
        let mut frac = end + 1;
        while frac < bytes.len() && bytes[frac].is_ascii_digit() {
            frac += 1;
        }
        // A bare trailing dot is not part of the number
        if frac > end + 1 {
            end = frac;
        }
    }
    let value = s[..end].parse().ok()?;
    Some((value, &s[end..]))
}
