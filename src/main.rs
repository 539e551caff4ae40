//! Head scroll application: scroll the mouse wheel by tilting your head.

use anyhow::{Context, Result};
use clap::Parser;
use head_scroll::{
    app::ScrollApp,
    config::Config,
    input::Overflow,
    pose::AngleUnit,
    scroll_output::OutputBackend,
};
use log::info;
use std::{
    fs::File,
    io::{self, BufReader},
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Read poses from a file instead of stdin (replayed without dropping frames)
    #[arg(short, long)]
    input: Option<String>,

    /// Lines scrolled per frame
    #[arg(short, long)]
    sensitivity: Option<i32>,

    /// Roll (radians) that enables or disables scrolling
    #[arg(long)]
    roll_threshold: Option<f64>,

    /// Pitch deadzone (radians)
    #[arg(long)]
    pitch_deadzone: Option<f64>,

    /// Input angles are in degrees
    #[arg(long)]
    degrees: bool,

    /// Log scroll events instead of posting them
    #[arg(long)]
    dry_run: bool,

    /// Reverse scroll direction
    #[arg(long)]
    invert: bool,

    /// Camera index forwarded to the pose provider
    #[arg(long)]
    cam: Option<u32>,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    /// Print the effective configuration as YAML and exit
    #[arg(long)]
    print_config: bool,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<String>,
}

fn apply_overrides(config: &mut Config, args: &Args) {
    if let Some(sensitivity) = args.sensitivity {
        config.controller.sensitivity = sensitivity;
    }
    if let Some(roll_threshold) = args.roll_threshold {
        config.controller.roll_enable_threshold = roll_threshold;
    }
    if let Some(pitch_deadzone) = args.pitch_deadzone {
        config.controller.pitch_deadzone = pitch_deadzone;
    }
    if args.degrees {
        config.input.angle_unit = AngleUnit::Degrees;
    }
    if args.dry_run {
        config.output.backend = OutputBackend::Log;
    }
    if args.invert {
        config.output.invert = true;
    }
    if let Some(cam) = args.cam {
        config.capture.camera_index = cam;
    }
    if args.input.is_some() {
        config.input.overflow = Overflow::Block;
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    info!("Head Scroll");

    let mut config = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {}", config_path);
        match Config::from_file(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::warn!("Failed to load config file: {}. Using defaults.", e);
                Config::default()
            }
        }
    } else {
        Config::default()
    };
    apply_overrides(&mut config, &args);

    if args.print_config {
        print!("{}", config.to_yaml()?);
        return Ok(());
    }

    let mut app = ScrollApp::new(config).context("Failed to start head scroll")?;

    let summary = if let Some(path) = &args.input {
        info!("Reading poses from {}", path);
        let file = File::open(path).with_context(|| format!("Failed to open pose input {path}"))?;
        app.run(BufReader::new(file))?
    } else {
        info!("Reading poses from stdin");
        app.run(BufReader::new(io::stdin()))?
    };

    info!(
        "Done: {} frames, {} scroll commands, {} gate transitions",
        summary.frames_processed, summary.commands_emitted, summary.transitions
    );

    Ok(())
}
