//! Filterboard CLI - interactive audience-filter builder.

use std::path::PathBuf;

use clap::Parser;
use filterboard_core::{BuilderConfig, FilterBuilder};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod repl;
mod repl_commands;
mod surface;

use surface::TerminalSurface;

/// Filterboard - build audience filter expressions interactively
#[derive(Parser, Debug)]
#[command(name = "filterboard")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file (TOML); defaults to ./filterboard.toml
    #[arg(short, long, env = "FILTERBOARD_CONFIG")]
    config: Option<PathBuf>,

    /// Apply a filter JSON file, print the resulting mirror, and exit
    #[arg(short, long)]
    apply: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => BuilderConfig::from_file(path)?,
        None => BuilderConfig::load()?,
    };

    if let Some(path) = args.apply {
        let raw = std::fs::read_to_string(&path)?;
        let mut builder = FilterBuilder::new(config, TerminalSurface::quiet());
        builder
            .apply_text(&raw)
            .map_err(|err| anyhow::anyhow!("{err}"))?;
        println!("{}", builder.mirror());
        return Ok(());
    }

    let builder = FilterBuilder::new(config, TerminalSurface::new());
    repl::run(builder)
}
