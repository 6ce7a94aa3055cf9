//! # Wafermill I/O
//!
//! The external-format boundary of the pipeline: serialization of a die
//! grid into the fixed-schema SINF/KLA wafer-map byte format, the inverse
//! heuristic reparser used by the live edit loop, the end-to-end
//! conversion driver, and the stock bin-definition table.

pub mod bins;
pub mod convert;
pub mod reparse;
pub mod sinf;

pub use bins::{default_bin_rows, parse_bin_template};
pub use convert::{convert, parse_structure_filter, Conversion, ConvertError, ConvertSettings};
pub use reparse::reparse;
pub use sinf::{format_map, LineMode, SinfError, WaferMapDocument};
