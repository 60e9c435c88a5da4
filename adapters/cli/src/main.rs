#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a Vortex Defence level without graphics.

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use vortex_defence_cli::{LevelConfig, Simulation};

/// Runs a Vortex Defence level headlessly and prints the outcome.
#[derive(Debug, Parser)]
#[command(name = "vortex-defence", version)]
struct Cli {
    /// Level description in TOML; the built-in open field is used when omitted.
    #[arg(long, value_name = "PATH")]
    level: Option<PathBuf>,
    /// Maximum number of ticks to simulate.
    #[arg(long, default_value_t = 2_000)]
    ticks: u32,
    /// Simulated milliseconds per tick.
    #[arg(long, default_value_t = 16, value_parser = clap::value_parser!(u64).range(1..))]
    tick_ms: u64,
}

/// Entry point for the Vortex Defence command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let level = match &cli.level {
        Some(path) => LevelConfig::load(path)?,
        None => LevelConfig::default(),
    };
    let mut simulation = Simulation::from_level(&level).context("failed to build the level")?;
    println!("{}", simulation.welcome_banner());
    info!(ticks = cli.ticks, tick_ms = cli.tick_ms, "starting simulation");

    let summary = simulation.run(cli.ticks, Duration::from_millis(cli.tick_ms));
    println!("{summary}");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
