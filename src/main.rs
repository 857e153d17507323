//! Mouthpose - calibration diagnostics CLI
//!
//! Loads a calibration JSON export, validates it, and prints the derived
//! vowel basis and per-vowel target diagnostics. The live tracking loop
//! lives in the host application; this binary only exercises the
//! load-time path.

use clap::Parser;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use mouthpose::calibration;
use mouthpose::features;
use mouthpose::vowel::{self, Vowel};
use mouthpose::{Config, OverlaySession};

/// Mouthpose - vowel mouth-shape overlay diagnostics
#[derive(Parser, Debug)]
#[command(name = "mouthpose", version, about, long_about = None)]
struct Args {
    /// Calibration JSON file exported by the capture UI
    calibration: PathBuf,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Vowel symbol to synthesize and summarize
    #[arg(short, long, default_value = "a")]
    vowel: String,

    /// Enable verbose logging
    #[arg(long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(log_level.into())
                .from_env_lossy(),
        )
        .init();

    let config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };

    let payload = std::fs::read_to_string(&args.calibration)?;
    let set = calibration::from_json(&payload)?;
    info!("calibration loaded from {}", args.calibration.display());

    let epsilon = config.geometry.epsilon;
    for pose in calibration::CalibrationPose::ALL {
        let frame = set.frame(pose);
        let f = features::extract(frame.landmarks(), epsilon)
            .map_err(|source| mouthpose::error::CalibrationError::Degenerate {
                pose: pose.name(),
                source,
            })?;
        println!(
            "{:>8}: aperture {:+.4}  width {:.4}  pucker {:.4}",
            pose.name(),
            f.aperture,
            f.width,
            f.pucker
        );
    }

    let session = OverlaySession::new(set, config)?;
    let basis = session.basis();
    println!(
        "basis rates: open {:.4}  round {:.4}  spread {:.4}",
        basis.open_rate, basis.round_rate, basis.spread_rate
    );

    let selected = Vowel::from_symbol(&args.vowel).map_err(mouthpose::MouthposeError::Frame)?;
    let target = vowel::synthesize(selected, session.calibration())
        .map_err(mouthpose::MouthposeError::Frame)?;
    let centroid = target.values().sum::<glam::Vec3>() / target.len() as f32;
    println!(
        "vowel '{}': {} target points, centroid ({:.4}, {:.4}, {:.4})",
        selected.symbol(),
        target.len(),
        centroid.x,
        centroid.y,
        centroid.z
    );

    Ok(())
}
