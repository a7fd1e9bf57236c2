//! ballsight CLI — run best-ball selection over a color-segmented frame.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use ballsight::{BallDetector, CameraModel, ColorMap, DetectBallsConfig, FieldGeometry};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "ballsight")]
#[command(about = "Select the best ball candidate from a color-segmented frame")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run ball detection over one frame.
    Detect(CliDetectArgs),

    /// Print the default detection configuration as JSON.
    ConfigInfo,

    /// Print the default field geometry as JSON.
    FieldInfo,
}

#[derive(Debug, Clone, Args)]
struct CliDetectArgs {
    /// Path to the class-indexed segmented frame (8-bit PNG, pixel value =
    /// color channel id).
    #[arg(long)]
    segmented: PathBuf,

    /// Path to the region candidate list for the ball color (JSON).
    #[arg(long)]
    regions: PathBuf,

    /// Path to the calibrated camera model (JSON).
    #[arg(long)]
    camera: PathBuf,

    /// Path to the field geometry (JSON). A standard field is assumed when
    /// omitted.
    #[arg(long)]
    field: Option<PathBuf>,

    /// Path to the detection configuration (JSON). Defaults apply when
    /// omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to the ordered color label list (JSON). The stock map is used
    /// when omitted.
    #[arg(long)]
    colors: Option<PathBuf>,

    /// Path to write the detection report (JSON).
    #[arg(long)]
    out: PathBuf,
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Detect(args) => run_detect(&args),
        Commands::ConfigInfo => run_config_info(),
        Commands::FieldInfo => run_field_info(),
    }
}

// ── detect ────────────────────────────────────────────────────────────

fn run_detect(args: &CliDetectArgs) -> CliResult<()> {
    let segmented = image::open(&args.segmented)?.into_luma8();
    let regions: Vec<ballsight::Region> =
        serde_json::from_str(&std::fs::read_to_string(&args.regions)?)?;
    let camera = CameraModel::from_json_file(&args.camera)?;

    let field = match &args.field {
        Some(path) => FieldGeometry::from_json_file(path)?,
        None => FieldGeometry::default(),
    };
    let config = match &args.config {
        Some(path) => DetectBallsConfig::from_json_file(path)?,
        None => DetectBallsConfig::default(),
    };
    let colors = match &args.colors {
        Some(path) => ColorMap::from_json_file(path)?,
        None => ColorMap::default(),
    };

    let mut detector = BallDetector::new(config, colors);
    let report = detector.detect(&segmented, &regions, &camera, &field)?;

    if report.ball.present {
        tracing::info!(
            "ball at ({:.0}, {:.0}) mm, confidence {:.2}, {} candidates scored",
            report.ball.field_xy[0],
            report.ball.field_xy[1],
            report.ball.confidence,
            report.n_candidates,
        );
    } else {
        tracing::info!(
            n_candidates = report.n_candidates,
            "no acceptable ball candidate"
        );
    }

    let json = serde_json::to_string_pretty(&report)?;
    std::fs::write(&args.out, &json)?;
    tracing::info!("Report written to {}", args.out.display());

    Ok(())
}

// ── config-info ───────────────────────────────────────────────────────

fn run_config_info() -> CliResult<()> {
    let config = DetectBallsConfig::default();
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

// ── field-info ────────────────────────────────────────────────────────

fn run_field_info() -> CliResult<()> {
    let field = FieldGeometry::default();
    println!("{}", serde_json::to_string_pretty(&field)?);
    Ok(())
}
