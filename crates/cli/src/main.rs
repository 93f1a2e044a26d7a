//! blobgraph - cluster particles by proximity
//!
//! Reads a particle measurement table (JSON), computes separation
//! distances on edges, centroids or centers of mass, links particles
//! closer than the neighbor distance and reports the connected
//! components.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use blobgraph_core::report::OverlayAnnotation;
use blobgraph_core::{
    Calibration, ClusterReport, DistanceKind, GraphParams, MeasurementTable, NearestSearch,
    RunContext,
};
use clap::{ArgAction, Parser, ValueEnum};

/// Separation distance to compute.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum DistanceArg {
    /// Nearest points on the traced outlines (default)
    #[default]
    Edges,
    /// Centroid to centroid
    Centroids,
    /// Center of mass to center of mass
    CentersOfMass,
}

impl From<DistanceArg> for DistanceKind {
    fn from(arg: DistanceArg) -> Self {
        match arg {
            DistanceArg::Edges => Self::Edges,
            DistanceArg::Centroids => Self::Centroids,
            DistanceArg::CentersOfMass => Self::CentersOfMass,
        }
    }
}

/// Nearest boundary-point search strategy.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum SearchArg {
    /// Exhaustive point-pair scan (default)
    #[default]
    Brute,
    /// R-tree per outline
    Indexed,
}

impl From<SearchArg> for NearestSearch {
    fn from(arg: SearchArg) -> Self {
        match arg {
            SearchArg::Brute => Self::BruteForce,
            SearchArg::Indexed => Self::Indexed,
        }
    }
}

/// Group particles closer than a given distance into connected components.
#[derive(Parser, Debug)]
#[command(name = "blobgraph")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Measurement table (JSON), or "-" for stdin
    table: PathBuf,

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,

    // === Graph options ===
    /// Distance between particles
    #[arg(short = 'D', long, value_enum, default_value = "edges")]
    distance: DistanceArg,

    /// Particles closer than this (calibrated units) are neighbors
    #[arg(short = 'n', long, default_value = "10.0")]
    neighbors: f64,

    /// Nearest boundary-point search
    #[arg(long, value_enum, default_value = "brute")]
    search: SearchArg,

    /// Option string, e.g. "distance=[Centers of Mass] neighbors=35 lines";
    /// applied after the flags above
    #[arg(long)]
    options: Option<String>,

    // === Calibration (overrides the table's) ===
    /// Pixel width in calibrated units
    #[arg(long = "pixel-width")]
    pixel_width: Option<f64>,

    /// Pixel height in calibrated units
    #[arg(long = "pixel-height")]
    pixel_height: Option<f64>,

    /// X origin in pixels
    #[arg(long = "x-origin")]
    x_origin: Option<f64>,

    /// Y origin in pixels
    #[arg(long = "y-origin")]
    y_origin: Option<f64>,

    // === Output options ===
    /// Report nearest-point segments of connected pairs
    #[arg(long, action = ArgAction::SetTrue)]
    lines: bool,

    /// Report distance labels of connected pairs
    #[arg(long, action = ArgAction::SetTrue)]
    labels: bool,

    /// Report the distance matrix
    #[arg(long, action = ArgAction::SetTrue)]
    matrix: bool,

    /// Write the distance matrix CSV here instead of the main output
    #[arg(long = "matrix-out")]
    matrix_out: Option<PathBuf>,

    /// Report the seed pixel and component label of each particle
    #[arg(long, action = ArgAction::SetTrue)]
    seeds: bool,

    /// Emit the full report as JSON
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,

    /// Path to file where output is written, or "-" for stdout
    #[arg(short = 'o', long, default_value = "-")]
    outfile: String,
}

/// Build GraphParams from command line arguments.
fn build_params(args: &Args) -> Result<GraphParams> {
    let mut params = GraphParams {
        distance: args.distance.into(),
        neighbors: args.neighbors,
        show_lines: args.lines,
        show_labels: args.labels,
        show_matrix: args.matrix || args.matrix_out.is_some(),
        search: args.search.into(),
        ..GraphParams::default()
    };
    if let Some(ref options) = args.options {
        params
            .apply_options(options)
            .with_context(|| format!("invalid --options {options:?}"))?;
    }
    params.validate()?;
    Ok(params)
}

fn apply_calibration(args: &Args, mut cal: Calibration) -> Calibration {
    if let Some(v) = args.pixel_width {
        cal.pixel_width = v;
    }
    if let Some(v) = args.pixel_height {
        cal.pixel_height = v;
    }
    if let Some(v) = args.x_origin {
        cal.x_origin = v;
    }
    if let Some(v) = args.y_origin {
        cal.y_origin = v;
    }
    cal
}

fn load_table(path: &Path) -> Result<MeasurementTable> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        return MeasurementTable::from_json_str(&buf).context("parsing table from stdin");
    }
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    MeasurementTable::from_json_reader(BufReader::new(file))
        .with_context(|| format!("parsing {}", path.display()))
}

fn write_overlay<W: Write>(out: &mut W, overlay: &[OverlayAnnotation]) -> io::Result<()> {
    for ann in overlay {
        if let Some(line) = ann.line {
            writeln!(
                out,
                "line {}-{}: ({}, {}) -> ({}, {})",
                ann.i + 1,
                ann.j + 1,
                line.start.x,
                line.start.y,
                line.end.x,
                line.end.y
            )?;
        }
        if let Some(ref label) = ann.label {
            writeln!(
                out,
                "label {}-{} at ({}, {}): {}",
                ann.i + 1,
                ann.j + 1,
                label.x,
                label.y,
                label.text
            )?;
        }
    }
    Ok(())
}

fn write_report<W: Write>(out: &mut W, report: &ClusterReport, args: &Args) -> Result<()> {
    if args.json {
        writeln!(out, "{}", report.to_json()?)?;
        return Ok(());
    }

    for line in report.log_lines() {
        writeln!(out, "{line}")?;
    }

    write_overlay(out, &report.overlay())?;

    if args.seeds {
        for seed in report.label_seeds() {
            writeln!(
                out,
                "seed {}: ({}, {}) -> {}",
                seed.item, seed.x, seed.y, seed.label
            )?;
        }
    }

    if report.params.show_matrix {
        match args.matrix_out {
            Some(ref path) => {
                let file = File::create(path)
                    .with_context(|| format!("creating {}", path.display()))?;
                let mut writer = BufWriter::new(file);
                report.write_matrix_csv(&mut writer)?;
                writer.flush()?;
            }
            None => {
                writeln!(out, "Distance Matrix")?;
                report.write_matrix_csv(out)?;
            }
        }
    }
    Ok(())
}

fn log_level(debug: bool) -> tracing::Level {
    if debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(log_level(args.debug))
        .with_writer(io::stderr)
        .init();

    let params = build_params(&args)?;
    let table = load_table(&args.table)?;
    let context = RunContext::from_table(&table, params)?;
    let calibration = apply_calibration(&args, *context.calibration());
    let report = context.with_calibration(calibration).run()?;

    let mut output: Box<dyn Write> = if args.outfile == "-" {
        Box::new(BufWriter::new(io::stdout()))
    } else {
        let file = File::create(&args.outfile)
            .with_context(|| format!("creating output file {}", args.outfile))?;
        Box::new(BufWriter::new(file))
    };
    write_report(&mut output, &report, &args)?;
    output.flush()?;

    Ok(())
}
