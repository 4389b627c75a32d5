#![deny(unsafe_code)]
//! CLI for the woodgrain background.
//!
//! Subcommands:
//! - `render`: replay an event script and write the SVG scene
//! - `knots`: replay an event script and print the knot state
//! - `schema`: print the tunable parameters

mod error;

use clap::{Parser, Subcommand};
use error::CliError;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use woodgrain_core::{InputEvent, Viewport, WoodgrainConfig, WoodgrainEngine};

#[derive(Parser)]
#[command(name = "woodgrain", about = "Procedural woodgrain background renderer")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

/// Options shared by every command that builds an engine.
#[derive(clap::Args)]
struct Setup {
    /// Config file (JSON). Missing keys use the defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Viewport width in pixels (overrides the config).
    #[arg(short = 'W', long)]
    width: Option<f64>,

    /// Viewport height in pixels (overrides the config).
    #[arg(short = 'H', long)]
    height: Option<f64>,

    /// Flat parameter overrides as a JSON string.
    #[arg(long, default_value = "{}")]
    params: String,

    /// JSON array of input events to replay before output.
    #[arg(short, long)]
    events: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Replay events and write the background as SVG.
    Render {
        #[command(flatten)]
        setup: Setup,

        /// Output file path.
        #[arg(short, long, default_value = "woodgrain.svg")]
        output: PathBuf,
    },
    /// Replay events and print the resulting knot state.
    Knots {
        #[command(flatten)]
        setup: Setup,
    },
    /// Print the tunable parameters with their defaults.
    Schema,
}

fn load_config(setup: &Setup) -> Result<WoodgrainConfig, CliError> {
    let mut config = match &setup.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .map_err(|e| CliError::Io(format!("{}: {e}", path.display())))?;
            WoodgrainConfig::from_json_str(&text)?
        }
        None => WoodgrainConfig::default(),
    };
    let params: serde_json::Value = serde_json::from_str(&setup.params)
        .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
    config.apply_params(&params);
    if setup.width.is_some() || setup.height.is_some() {
        config.viewport = Viewport::new(
            setup.width.unwrap_or(config.viewport.width()),
            setup.height.unwrap_or(config.viewport.height()),
        )?;
    }
    Ok(config)
}

fn load_events(path: &Path) -> Result<Vec<InputEvent>, CliError> {
    let text =
        fs::read_to_string(path).map_err(|e| CliError::Io(format!("{}: {e}", path.display())))?;
    serde_json::from_str(&text)
        .map_err(|e| CliError::Input(format!("invalid event script {}: {e}", path.display())))
}

/// Builds the engine and replays the event script, if any.
fn prepare(setup: &Setup) -> Result<(WoodgrainEngine, usize), CliError> {
    let mut engine = WoodgrainEngine::new(load_config(setup)?)?;
    let events = match &setup.events {
        Some(path) => load_events(path)?,
        None => Vec::new(),
    };
    for event in &events {
        engine.handle(event);
    }
    log::info!("replayed {} events", events.len());
    Ok((engine, events.len()))
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Schema => {
            let engine = WoodgrainEngine::new(WoodgrainConfig::default())?;
            println!("{}", serde_json::to_string_pretty(&engine.param_schema())?);
        }
        Command::Knots { setup } => {
            let (engine, _) = prepare(&setup)?;
            let state = engine.knots_json();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&state)?);
            } else {
                for knot in engine.model().knots() {
                    println!(
                        "knot {}: {:?} pos=({:.3}, {:.3}) r={:.1} sigma={:.1} k={:.2}",
                        knot.id,
                        knot.growth,
                        knot.position.x,
                        knot.position.y,
                        knot.radius,
                        knot.sigma,
                        knot.strength
                    );
                }
            }
        }
        Command::Render { setup, output } => {
            let (mut engine, replayed) = prepare(&setup)?;
            let scene = engine.scene();
            let (w, h, paths) = (scene.viewport.width(), scene.viewport.height(), scene.paths.len());
            fs::write(&output, scene.to_svg())
                .map_err(|e| CliError::Io(format!("{}: {e}", output.display())))?;

            if cli.json {
                let info = serde_json::json!({
                    "width": w,
                    "height": h,
                    "paths": paths,
                    "events": replayed,
                    "output": output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "rendered {w}x{h} ({paths} lines, {replayed} events) -> {}",
                    output.display()
                );
            }
        }
    }

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
