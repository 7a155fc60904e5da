//! centerline-tools command line

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

use centerline_tools::formats::{
    self, read_centerline_csv, read_kmz, write_centerline_csv, write_kmz, write_lines_kml,
    write_zip_bundle, AltitudeMode, KmlOptions,
};
use centerline_tools::{
    group_sections, Error, GeoPoint, Pipeline, PipelineConfig, Result, Section,
};

/// Geodetic smoothing of surveyed centerlines
#[derive(Parser)]
#[command(name = "centerline-tools")]
#[command(about = "Smooth, resample and annotate surveyed centerlines", long_about = None)]
#[command(version)]
struct Cli {
    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Smooth KML/KMZ surveys into centerline CSV files
    ToCsv {
        /// Survey files
        #[arg(name = "KML", required = true)]
        inputs: Vec<PathBuf>,

        /// Zip bundle receiving one CSV per input
        #[arg(short, long, default_value = "centerlines.zip")]
        output: PathBuf,

        /// Write loose CSV files into this directory instead of a bundle
        #[arg(long, conflicts_with = "output")]
        out_dir: Option<PathBuf>,

        /// Pipeline settings as JSON (see `defaults`)
        #[arg(long)]
        config: Option<PathBuf>,

        #[command(flatten)]
        overrides: ConfigOverrides,
    },

    /// Render centerline CSV files as a lines KMZ
    ToKmz {
        /// Centerline CSV files, one line each
        #[arg(name = "CSV", required = true)]
        inputs: Vec<PathBuf>,

        #[arg(short, long, default_value = "lines.kmz")]
        output: PathBuf,

        /// Vertical exaggeration of absolute heights
        #[arg(long)]
        exaggeration: Option<f64>,

        /// Meters added to every altitude
        #[arg(long)]
        offset: Option<f64>,

        /// absolute or clampToGround
        #[arg(long)]
        altitude_mode: Option<AltitudeMode>,
    },

    /// Print the default pipeline settings as JSON
    Defaults,
}

/// Per-field overrides of the pipeline settings
#[derive(Args)]
struct ConfigOverrides {
    #[arg(long)]
    max_segment_length: Option<f64>,

    #[arg(long)]
    densify_spacing: Option<f64>,

    /// Spacing of output points in meters
    #[arg(long)]
    output_spacing: Option<f64>,

    #[arg(long)]
    spline_detail: Option<usize>,

    #[arg(long)]
    curve_arc_length: Option<f64>,

    #[arg(long)]
    straight_line_threshold: Option<f64>,

    #[arg(long)]
    spline_tension: Option<f64>,

    #[arg(long)]
    min_section_points: Option<usize>,

    /// Skip curve radius estimation
    #[arg(long)]
    no_curves: bool,
}

impl ConfigOverrides {
    fn apply(&self, config: &mut PipelineConfig) {
        if let Some(v) = self.max_segment_length {
            config.max_segment_length = v;
        }
        if let Some(v) = self.densify_spacing {
            config.densify_spacing = v;
        }
        if let Some(v) = self.output_spacing {
            config.output_spacing = v;
        }
        if let Some(v) = self.spline_detail {
            config.spline_detail = v;
        }
        if let Some(v) = self.curve_arc_length {
            config.curve_arc_length = v;
        }
        if let Some(v) = self.straight_line_threshold {
            config.straight_line_threshold = v;
        }
        if let Some(v) = self.spline_tension {
            config.spline_tension = v;
        }
        if let Some(v) = self.min_section_points {
            config.min_section_points = v;
        }
        if self.no_curves {
            config.find_curves = false;
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    match cli.command {
        Commands::ToCsv {
            inputs,
            output,
            out_dir,
            config,
            overrides,
        } => {
            let mut settings = match config {
                Some(path) => PipelineConfig::from_json_file(path)?,
                None => PipelineConfig::default(),
            };
            overrides.apply(&mut settings);
            to_csv(&inputs, &output, out_dir.as_deref(), settings)
        }
        Commands::ToKmz {
            inputs,
            output,
            exaggeration,
            offset,
            altitude_mode,
        } => {
            let mut options = KmlOptions::default();
            if let Some(v) = exaggeration {
                options.exaggeration = v;
            }
            if let Some(v) = offset {
                options.offset = v;
            }
            if let Some(mode) = altitude_mode {
                options.altitude_mode = mode;
            }
            to_kmz(&inputs, &output, &options)
        }
        Commands::Defaults => {
            println!("{}", PipelineConfig::default().to_json()?);
            Ok(())
        }
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("centerline")
        .to_string()
}

fn read_survey(path: &Path) -> Result<Vec<GeoPoint>> {
    let is_kmz = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("kmz"));

    let points = if is_kmz {
        formats::parse_kml(&read_kmz(File::open(path)?)?)?
    } else {
        formats::read_kml(path)?
    };

    if points.is_empty() {
        return Err(Error::InvalidFormat(format!(
            "No points found in {}",
            path.display()
        )));
    }
    Ok(points)
}

fn to_csv(inputs: &[PathBuf], output: &Path, out_dir: Option<&Path>, config: PipelineConfig) -> Result<()> {
    let pipeline = Pipeline::new(config)?;
    let mut files: Vec<(String, Vec<GeoPoint>)> = Vec::with_capacity(inputs.len());

    for input in inputs {
        let points = read_survey(input)?;
        let sections = group_sections(points);
        let smoothed = pipeline.process_sections(&sections)?;

        log::info!(
            "{}: {} sections -> {} points",
            input.display(),
            sections.len(),
            smoothed.len()
        );
        if smoothed.is_empty() {
            log::warn!("{}: no section had enough points", input.display());
        }
        files.push((format!("{}.csv", file_stem(input)), smoothed));
    }

    match out_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            for (name, points) in &files {
                let path = dir.join(name);
                write_centerline_csv(BufWriter::new(File::create(&path)?), points)?;
                log::info!("Wrote {}", path.display());
            }
        }
        None => {
            write_zip_bundle(File::create(output)?, &files)?;
            log::info!("Wrote {} ({} files)", output.display(), files.len());
        }
    }
    Ok(())
}

fn to_kmz(inputs: &[PathBuf], output: &Path, options: &KmlOptions) -> Result<()> {
    let mut sections = Vec::with_capacity(inputs.len());
    for input in inputs {
        let points = read_centerline_csv(input)?;
        log::info!("{}: {} points", input.display(), points.len());
        sections.push(Section::new(file_stem(input), points));
    }

    let kml = write_lines_kml(&sections, options)?;
    write_kmz(File::create(output)?, &kml)?;
    log::info!("Wrote {}", output.display());
    Ok(())
}
