//! End-to-end conversion driver: GDS2 listing in, wafer-map bytes out.
//!
//! The driver validates the configuration snapshot before any pipeline
//! stage runs, so a bad diameter or die size is never partially applied.
//! Everything downstream is pure; a caller that wants the conversion off
//! its interactive thread only has to pass an immutable settings snapshot
//! and serialize its own requests.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use wafermill_core::{build_grid, extract, DieGrid};

use crate::sinf::{format_map, LineMode, SinfError, WaferMapDocument};

/// Wafer id substituted when the caller leaves the field blank.
pub const DEFAULT_WAFER_ID: &str = "GDS2_WAFER_MAP";

/// Immutable configuration snapshot for one conversion run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertSettings {
    pub wafer_id: String,
    pub diameter_mm: f64,
    pub die_x_mm: f64,
    pub die_y_mm: f64,
    /// Structure-name filter; empty accepts every `SNAME`.
    pub structures: Vec<String>,
    pub show_edge: bool,
    pub line_mode: LineMode,
    /// Pre-formatted bin-definition lines, passed through verbatim.
    pub bin_rows: Vec<String>,
}

impl Default for ConvertSettings {
    fn default() -> Self {
        Self {
            wafer_id: DEFAULT_WAFER_ID.to_string(),
            diameter_mm: 147.3,
            die_x_mm: 1.473,
            die_y_mm: 1.473,
            structures: Vec::new(),
            show_edge: true,
            line_mode: LineMode::Sinf,
            bin_rows: Vec::new(),
        }
    }
}

impl ConvertSettings {
    /// Reject non-finite or non-positive geometry before the pipeline
    /// touches it.
    pub fn validate(&self) -> Result<(), ConvertError> {
        if !self.diameter_mm.is_finite() || self.diameter_mm <= 0.0 {
            return Err(ConvertError::InvalidDiameter(self.diameter_mm));
        }
        if !self.die_x_mm.is_finite()
            || self.die_x_mm <= 0.0
            || !self.die_y_mm.is_finite()
            || self.die_y_mm <= 0.0
        {
            return Err(ConvertError::InvalidDieSize {
                x: self.die_x_mm,
                y: self.die_y_mm,
            });
        }
        Ok(())
    }
}

/// Split a comma-separated structure-name field into a filter list.
/// Surrounding whitespace is trimmed and empty entries are dropped.
pub fn parse_structure_filter(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("wafer diameter must be a positive number of millimeters, got {0}")]
    InvalidDiameter(f64),

    #[error("die size must be positive on both axes, got {x} x {y} mm")]
    InvalidDieSize { x: f64, y: f64 },

    #[error("no die coordinates found; check that the structure filter matches the SNAME records in the listing")]
    NoCoordinates,

    #[error(transparent)]
    Sinf(#[from] SinfError),
}

/// Result of one conversion run, held by the caller for redraws and the
/// reverse edit loop.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    /// Number of placement records extracted (the displayed die count).
    pub record_count: usize,
    pub grid: DieGrid,
    pub bytes: Vec<u8>,
}

/// Run extract → build grid → format over one settings snapshot.
///
/// Zero matching coordinates is surfaced as [`ConvertError::NoCoordinates`]
/// rather than formatting the fallback grid; callers invoking
/// [`build_grid`] directly still get the fallback.
pub fn convert(gds_text: &str, settings: &ConvertSettings) -> Result<Conversion, ConvertError> {
    settings.validate()?;

    let records = extract(gds_text, &settings.structures);
    if records.is_empty() {
        return Err(ConvertError::NoCoordinates);
    }

    let grid = build_grid(
        &records,
        settings.diameter_mm,
        settings.die_x_mm,
        settings.die_y_mm,
        settings.show_edge,
    );

    let wafer_id = if settings.wafer_id.trim().is_empty() {
        DEFAULT_WAFER_ID
    } else {
        settings.wafer_id.as_str()
    };
    let doc = WaferMapDocument {
        wafer_id: wafer_id.to_string(),
        diameter_mm: settings.diameter_mm,
        die_count: records.len(),
        grid,
        bin_rows: settings.bin_rows.clone(),
        line_mode: settings.line_mode,
    };
    let bytes = format_map(&doc)?;

    log::info!(
        "Converted {} records into a {}x{} map ({} bytes)",
        records.len(),
        doc.grid.row_count(),
        doc.grid.col_count(),
        bytes.len()
    );
    Ok(Conversion {
        record_count: records.len(),
        grid: doc.grid,
        bytes,
    })
}
