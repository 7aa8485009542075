use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use swerve_zenoh_runtime::config::{DEFAULT_DEPLOY_DIR, HEADING_TRANSLATION_SCALE, MAX_SPEED};
use swerve_zenoh_runtime::runtime::{self, DriveMode, RuntimeOptions};

/// Swerve drive runtime: joystick in, module telemetry out
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Deploy directory; swerve configuration is read from <DEPLOY_DIR>/swerve
    #[arg(long, default_value = DEFAULT_DEPLOY_DIR)]
    deploy_dir: PathBuf,

    /// Maximum module speed in m/s
    #[arg(long, default_value_t = MAX_SPEED)]
    max_speed: f64,

    /// Translation scale for heading mode, applied after cubing the inputs
    #[arg(long, default_value_t = HEADING_TRANSLATION_SCALE)]
    heading_scale: f64,

    /// Drive command to run
    #[arg(long, value_enum, default_value_t = DriveMode::Heading)]
    mode: DriveMode,
}

#[tokio::main]
async fn main() {
    // Setup logging (set RUST_LOG=info or debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    let options = RuntimeOptions {
        deploy_dir: args.deploy_dir,
        max_speed: args.max_speed,
        heading_translation_scale: args.heading_scale,
        mode: args.mode,
    };

    if let Err(e) = runtime::run(options).await {
        eprintln!("Runtime error: {}", e);
        std::process::exit(1);
    }
}
