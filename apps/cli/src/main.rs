//! Command-line front end for the conversion pipeline.
//!
//! The pipeline itself is pure; this binary supplies file bytes and a
//! configuration snapshot and writes the formatted buffer back out.

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};

use wafermill_core::{detect_pitch, extract};
use wafermill_io::{
    convert, default_bin_rows, parse_bin_template, parse_structure_filter, reparse,
    ConvertSettings, LineMode,
};

#[derive(Debug, Parser)]
#[command(name = "wafermill", about = "Convert GDS2 ASCII listings into SINF/KLA wafer maps.")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Convert a GDS2 text listing into a wafer-map file.
    Convert {
        /// GDS2 ASCII listing.
        input: PathBuf,
        /// Output path; defaults to `<input stem>_wafermap.txt`.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// JSON settings file; flags below override its fields.
        #[arg(long)]
        settings: Option<PathBuf>,
        #[arg(long)]
        wafer_id: Option<String>,
        /// Wafer diameter in mm.
        #[arg(long)]
        diameter: Option<f64>,
        /// Die size X in mm.
        #[arg(long)]
        die_x: Option<f64>,
        /// Die size Y in mm.
        #[arg(long)]
        die_y: Option<f64>,
        /// Comma-separated SNAME filter; empty accepts all structures.
        #[arg(long)]
        structures: Option<String>,
        /// Suppress edge-die (`*`) marking.
        #[arg(long)]
        no_edge: bool,
        #[arg(long, value_enum)]
        line_mode: Option<LineModeArg>,
        /// Bin-template text file, one bin row per line.
        #[arg(long)]
        bins: Option<PathBuf>,
        /// Emit no bin table at all.
        #[arg(long, conflicts_with = "bins")]
        no_bins: bool,
    },
    /// Estimate the die pitch of a listing.
    Pitch {
        input: PathBuf,
        #[arg(long)]
        structures: Option<String>,
    },
    /// Reparse an existing wafer-map file and print its statistics.
    Show { input: PathBuf },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LineModeArg {
    Sinf,
    Crlf,
    Lf,
}

impl From<LineModeArg> for LineMode {
    fn from(mode: LineModeArg) -> Self {
        match mode {
            LineModeArg::Sinf => LineMode::Sinf,
            LineModeArg::Crlf => LineMode::Crlf,
            LineModeArg::Lf => LineMode::Lf,
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    match args.command {
        Command::Convert {
            input,
            output,
            settings,
            wafer_id,
            diameter,
            die_x,
            die_y,
            structures,
            no_edge,
            line_mode,
            bins,
            no_bins,
        } => {
            let mut cfg = match settings {
                Some(path) => serde_json::from_str(&fs::read_to_string(&path)?)?,
                None => ConvertSettings::default(),
            };
            if let Some(id) = wafer_id {
                cfg.wafer_id = id;
            }
            if let Some(d) = diameter {
                cfg.diameter_mm = d;
            }
            if let Some(x) = die_x {
                cfg.die_x_mm = x;
            }
            if let Some(y) = die_y {
                cfg.die_y_mm = y;
            }
            if let Some(raw) = structures {
                cfg.structures = parse_structure_filter(&raw);
            }
            if no_edge {
                cfg.show_edge = false;
            }
            if let Some(mode) = line_mode {
                cfg.line_mode = mode.into();
            }
            if no_bins {
                cfg.bin_rows.clear();
            } else if let Some(path) = bins {
                cfg.bin_rows = parse_bin_template(&fs::read_to_string(&path)?);
            } else if cfg.bin_rows.is_empty() {
                cfg.bin_rows = default_bin_rows();
            }

            let text = fs::read_to_string(&input)?;
            let conv = convert(&text, &cfg)?;
            let out_path = output.unwrap_or_else(|| default_output(&input));
            fs::write(&out_path, &conv.bytes)?;

            println!("Dies found: {}", conv.record_count);
            println!("Map rows:   {}", conv.grid.row_count());
            println!("Map cols:   {}", conv.grid.col_count());
            println!("File size:  {}", fmt_size(conv.bytes.len()));
            println!("Written to  {}", out_path.display());
        }
        Command::Pitch { input, structures } => {
            let filter = structures
                .map(|raw| parse_structure_filter(&raw))
                .unwrap_or_default();
            let text = fs::read_to_string(&input)?;
            let coords = extract(&text, &filter);
            if coords.is_empty() {
                return Err("no die coordinates found; check the structure filter".into());
            }
            let pitch = detect_pitch(&coords);
            match pitch.x {
                Some(x) => println!("Pitch X: {x:.6} mm"),
                None => println!("Pitch X: undetermined"),
            }
            match pitch.y {
                Some(y) => println!("Pitch Y: {y:.6} mm"),
                None => println!("Pitch Y: undetermined"),
            }
        }
        Command::Show { input } => {
            let bytes = fs::read(&input)?;
            let text: String = bytes.iter().map(|&b| b as char).collect();
            let grid = reparse(&text).ok_or("no wafer-map data section recognized")?;
            println!("Map rows:  {}", grid.row_count());
            println!("Map cols:  {}", grid.col_count());
            println!("Dies (?):  {}", grid.occupied_count());
            println!("File size: {}", fmt_size(bytes.len()));
        }
    }

    Ok(())
}

fn default_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "wafermap".to_string());
    input.with_file_name(format!("{stem}_wafermap.txt"))
}

fn fmt_size(bytes: usize) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
