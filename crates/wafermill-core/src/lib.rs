//! # Wafermill Core
//!
//! Numeric and geometric stages of the GDS2-to-wafer-map pipeline:
//! structure-placement extraction from GDS2 ASCII listings, die pitch
//! estimation, and radial die-grid construction.
//!
//! Every routine here is a pure function over its inputs — no I/O, no
//! shared state. The external wafer-map format lives in `wafermill-io`.

pub mod extract;
pub mod grid;
pub mod pitch;

pub use extract::{extract, PlacementRecord};
pub use grid::{build_grid, DieGrid, GridCell};
pub use pitch::{detect_pitch, Pitch};
