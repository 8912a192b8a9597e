mod cli;
mod config;
mod dataset;
mod diagnostics;
mod export;
mod extract;

use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use log::LevelFilter;

use cli::Cli;
use config::ExportConfig;
use dataset::GeoJsonProvider;
use diagnostics::StderrSink;

fn main() {
    // Missing .env is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    init_logger(cli.log_level.into());

    if cli.no_color {
        colored::control::set_override(false);
    }

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        process::exit(1);
    }
}

/// `--log-level` sets the baseline; `RUST_LOG` directives refine it
fn init_logger(level: LevelFilter) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.format_timestamp(None);
    let _ = builder.try_init();
}

fn run(cli: Cli) -> Result<()> {
    let provider = GeoJsonProvider::new();
    let config = ExportConfig::resolve(
        cli.provider_version.as_deref(),
        cli.config.as_deref(),
        &provider,
    )?;

    let mut sink = StderrSink::new();
    export::run_export(
        &provider,
        &config,
        &mut sink,
        &cli.dataset,
        &cli.output,
        &cli.format,
    )
    .with_context(|| format!("Failed to export {}", cli.dataset))?;

    if sink.reported() > 0 {
        log::warn!("Export finished with {} reported error(s)", sink.reported());
    }

    Ok(())
}
