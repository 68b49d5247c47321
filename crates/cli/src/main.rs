//! riptide CLI - rip current flow and risk data from bathymetry

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use riptide_algorithms::flow::{DepthGridParams, FlowVectorParams, RiskDirection, RiskParams};
use riptide_algorithms::output::{
    write_json, JsonStyle, DEPTH_GRID_FILE, FLOW_VECTORS_FILE, RISK_ZONES_FILE,
};
use riptide_algorithms::RipAnalysis;
use riptide_core::io::{read_geotiff, write_geotiff};
use riptide_core::{Raster, CRS};

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "riptide")]
#[command(author, version, about = "Rip current indicators from bathymetry rasters", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct BathymetryArgs {
    /// Single-band bathymetry GeoTIFF
    #[arg(short, long)]
    bathymetry: PathBuf,
    /// EPSG code to use when the raster carries none (or to override it)
    #[arg(long)]
    epsg: Option<u32>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show information about a raster file
    Info {
        /// Input raster file
        input: PathBuf,
    },
    /// Generate flow vectors and the downsampled depth grid
    Flow {
        #[command(flatten)]
        input: BathymetryArgs,
        /// Directory for flow_vectors.json and depth_grid.json
        #[arg(short, long, default_value = "docs/maps")]
        output_dir: PathBuf,
        /// Flow vector sampling stride in pixels
        #[arg(short, long, default_value = "15")]
        grid_spacing: usize,
        /// Depth grid downsample factor
        #[arg(short, long, default_value = "10")]
        downsample: usize,
        /// Also write the full-resolution gradient magnitude as GeoTIFF
        #[arg(long)]
        export_magnitude: Option<PathBuf>,
    },
    /// Generate the rip current risk heat map
    Risk {
        #[command(flatten)]
        input: BathymetryArgs,
        /// Output JSON file
        #[arg(short, long, default_value = "docs/maps/rip_risk_zones.json")]
        output: PathBuf,
        /// Risk sampling stride in pixels
        #[arg(short = 'r', long, default_value = "15")]
        grid_resolution: usize,
    },
    /// Generate flow vectors, depth grid and risk heat map
    All {
        #[command(flatten)]
        input: BathymetryArgs,
        /// Output directory
        #[arg(short, long, default_value = "docs/maps")]
        output_dir: PathBuf,
        /// Flow vector sampling stride in pixels
        #[arg(short, long, default_value = "15")]
        grid_spacing: usize,
        /// Risk sampling stride in pixels
        #[arg(short = 'r', long, default_value = "15")]
        grid_resolution: usize,
        /// Depth grid downsample factor
        #[arg(short, long, default_value = "10")]
        downsample: usize,
    },
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("warning: could not install log subscriber: {}", e);
    }
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn read_raster(path: &Path) -> Result<Raster<f64>> {
    let pb = spinner("Reading raster...");
    let raster = read_geotiff(path)
        .with_context(|| format!("Failed to read raster: {}", path.display()))?;
    pb.finish_and_clear();
    Ok(raster)
}

fn read_bathymetry(args: &BathymetryArgs) -> Result<Raster<f64>> {
    let mut raster = read_raster(&args.bathymetry)?;
    if let Some(code) = args.epsg {
        if let Some(existing) = raster.crs().filter(|crs| crs.epsg() != Some(code)) {
            warn!("overriding raster CRS {} with EPSG:{}", existing, code);
        }
        raster.set_crs(Some(CRS::from_epsg(code)));
    }
    let (rows, cols) = raster.shape();
    info!("Loaded bathymetry {} ({} x {})", args.bathymetry.display(), cols, rows);
    Ok(raster)
}

fn open_analysis<'a>(raster: &'a Raster<f64>, path: &Path) -> Result<RipAnalysis<'a>> {
    RipAnalysis::from_raster(raster).with_context(|| {
        format!(
            "Cannot georeference {} (pass --epsg to set its CRS)",
            path.display()
        )
    })
}

fn stage_context(stage: &str, path: &Path) -> String {
    format!("{} failed for {}", stage, path.display())
}

fn done(name: &str, path: &Path, elapsed: Duration) {
    println!("{} saved to: {}", name, path.display());
    println!("  Processing time: {:.2?}", elapsed);
}

// ─── Generators ─────────────────────────────────────────────────────────

fn generate_flow(
    analysis: &RipAnalysis<'_>,
    source: &Path,
    output_dir: &Path,
    grid_spacing: usize,
    downsample: usize,
) -> Result<()> {
    let start = Instant::now();
    let pb = spinner("Extracting flow vectors...");
    let params = FlowVectorParams {
        grid_spacing,
        ..Default::default()
    };
    let doc = analysis
        .flow_vectors(&params)
        .with_context(|| stage_context("Flow vector extraction", source))?;
    let path = output_dir.join(FLOW_VECTORS_FILE);
    write_json(&path, &doc, JsonStyle::Pretty)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    pb.finish_and_clear();
    println!("Flow vectors: {}", doc.metadata.total_vectors);
    done("Flow vectors", &path, start.elapsed());

    let start = Instant::now();
    let pb = spinner("Exporting depth grid...");
    let doc = analysis
        .depth_grid(&DepthGridParams { downsample })
        .with_context(|| stage_context("Depth grid export", source))?;
    let path = output_dir.join(DEPTH_GRID_FILE);
    write_json(&path, &doc, JsonStyle::Compact)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    pb.finish_and_clear();
    println!("Depth grid: {} x {}", doc.grid_size.cols, doc.grid_size.rows);
    done("Depth grid", &path, start.elapsed());

    Ok(())
}

fn generate_risk(
    analysis: &RipAnalysis<'_>,
    source: &Path,
    output: &Path,
    grid_resolution: usize,
) -> Result<()> {
    let start = Instant::now();
    let pb = spinner("Scoring rip current risk...");
    let params = RiskParams {
        grid_spacing: grid_resolution,
        ..Default::default()
    };
    let doc = analysis
        .risk_zones(&params)
        .with_context(|| stage_context("Risk scoring", source))?;
    write_json(output, &doc, JsonStyle::Pretty)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    pb.finish_and_clear();

    println!("Risk zones:");
    for direction in RiskDirection::ALL {
        println!(
            "  {:<9} {} cells",
            format!("{}:", direction),
            doc.risk_zones.get(direction).len()
        );
    }
    done("Risk heat map", output, start.elapsed());
    Ok(())
}

fn export_magnitude(
    analysis: &RipAnalysis<'_>,
    raster: &Raster<f64>,
    path: &Path,
) -> Result<()> {
    let start = Instant::now();
    let pb = spinner("Writing gradient magnitude...");
    let mut magnitude = Raster::from_array(analysis.flow_field().magnitude.clone())
        .with_transform(*raster.transform());
    magnitude.set_crs(raster.crs().cloned());
    write_geotiff(&magnitude, path)
        .with_context(|| format!("Failed to write raster: {}", path.display()))?;
    pb.finish_and_clear();
    done("Gradient magnitude", path, start.elapsed());
    Ok(())
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Commands::Info { input } => {
            let raster = read_raster(&input)?;
            let (rows, cols) = raster.shape();
            let bounds = raster.bounds();
            let stats = raster.statistics();

            println!("File: {}", input.display());
            println!("Dimensions: {} x {} ({} cells)", cols, rows, raster.len());
            println!("Cell size: {}", raster.cell_size());
            println!(
                "Bounds: ({:.6}, {:.6}) - ({:.6}, {:.6})",
                bounds.0, bounds.1, bounds.2, bounds.3
            );
            match raster.crs() {
                Some(crs) => println!("CRS: {}", crs),
                None => println!("CRS: none"),
            }
            if let Ok(analysis) = RipAnalysis::from_raster(&raster) {
                let geo = analysis.bounds();
                println!(
                    "Geographic bounds: S {:.6} W {:.6} N {:.6} E {:.6}",
                    geo.south, geo.west, geo.north, geo.east
                );
            }
            println!("\nStatistics:");
            if let Some(min) = stats.min {
                println!("  Min: {:.4}", min);
            }
            if let Some(max) = stats.max {
                println!("  Max: {:.4}", max);
            }
            if let Some(mean) = stats.mean {
                println!("  Mean: {:.4}", mean);
            }
            println!(
                "  Valid cells: {} ({:.1}%)",
                stats.valid_count,
                100.0 * stats.valid_count as f64 / raster.len().max(1) as f64
            );
            println!("  NoData cells: {}", stats.nodata_count);
        }

        Commands::Flow {
            input,
            output_dir,
            grid_spacing,
            downsample,
            export_magnitude: magnitude_path,
        } => {
            let raster = read_bathymetry(&input)?;
            let analysis = open_analysis(&raster, &input.bathymetry)?;
            generate_flow(
                &analysis,
                &input.bathymetry,
                &output_dir,
                grid_spacing,
                downsample,
            )?;
            if let Some(path) = magnitude_path {
                export_magnitude(&analysis, &raster, &path)?;
            }
        }

        Commands::Risk {
            input,
            output,
            grid_resolution,
        } => {
            let raster = read_bathymetry(&input)?;
            let analysis = open_analysis(&raster, &input.bathymetry)?;
            generate_risk(&analysis, &input.bathymetry, &output, grid_resolution)?;
        }

        Commands::All {
            input,
            output_dir,
            grid_spacing,
            grid_resolution,
            downsample,
        } => {
            let start = Instant::now();
            let raster = read_bathymetry(&input)?;
            let analysis = open_analysis(&raster, &input.bathymetry)?;
            generate_flow(
                &analysis,
                &input.bathymetry,
                &output_dir,
                grid_spacing,
                downsample,
            )?;
            generate_risk(
                &analysis,
                &input.bathymetry,
                &output_dir.join(RISK_ZONES_FILE),
                grid_resolution,
            )?;
            debug!("all outputs written to {}", output_dir.display());
            println!("\nTotal time: {:.2?}", start.elapsed());
        }
    }

    Ok(())
}
