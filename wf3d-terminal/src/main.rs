/// WF3D - run a drawing script
///
/// Reads a script of drawing commands, saves images it asks for as PPM
/// files and shows `display` output in the terminal.
///
/// Usage:
///   wf3d scene.mdl
///   wf3d scene.mdl --width 800 --height 600 --step 0.05
///   RUST_LOG=debug wf3d scene.mdl
use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::info;
use wf3d_core::Color;
use wf3d_terminal::{config::DEFAULT_SIZE, Config, Interpreter};

#[derive(Parser)]
#[command(name = "wf3d")]
#[command(about = "Wireframe and solid renderer driven by command scripts")]
#[command(version)]
struct Cli {
    /// Script to run
    script: PathBuf,

    /// Image width in pixels
    #[arg(long, default_value_t = DEFAULT_SIZE)]
    width: usize,

    /// Image height in pixels
    #[arg(long, default_value_t = DEFAULT_SIZE)]
    height: usize,

    /// Parametric step for curves and solids
    #[arg(long, default_value_t = wf3d_core::DEFAULT_STEP)]
    step: f64,

    /// Background as r,g,b
    #[arg(long, default_value = "0,0,0")]
    background: Color,

    /// Edge color as r,g,b
    #[arg(long, default_value = "255,0,0")]
    edge_color: Color,

    /// Polygon color as r,g,b
    #[arg(long, default_value = "0,0,255")]
    polygon_color: Color,
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            width: self.width,
            height: self.height,
            step: self.step,
            background: self.background,
            edge_color: self.edge_color,
            polygon_color: self.polygon_color,
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = cli.config();
    config.validate().context("Invalid render settings")?;

    let source = fs::read_to_string(&cli.script)
        .with_context(|| format!("Couldn't open script {}", cli.script.display()))?;

    info!(
        "Running {} ({}x{}, step {})",
        cli.script.display(),
        config.width,
        config.height,
        config.step
    );
    let mut interpreter = Interpreter::new(config, io::stdout().lock());
    let summary = interpreter.run_source(&source);
    info!("{} commands run, {} skipped", summary.executed, summary.skipped);
    Ok(())
}
