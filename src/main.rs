//! wikifeed - syndication feeds for wiki recent changes, namespaces and search.

mod cli;
mod config;
mod core;
mod diff;
mod feed;
mod freshness;
mod logger;
mod utils;
mod wiki;

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::{ConfigHandle, Overrides, SiteConfig, find_config_file};
use std::path::PathBuf;
use std::sync::Arc;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose());

    let overrides = match &cli.command {
        Commands::Serve { interface, port, .. } => Overrides {
            interface: *interface,
            port: *port,
        },
        Commands::Render { .. } => Overrides::default(),
    };
    let config = SiteConfig::load(&config_path(&cli)?, &overrides)?;

    match &cli.command {
        Commands::Serve { .. } => cli::serve::serve(ConfigHandle::new(config)),
        Commands::Render { args } => cli::render::render(args, Arc::new(config)),
    }
}

/// `-C` path, or the nearest `wikifeed.toml` above the working directory.
fn config_path(cli: &Cli) -> Result<PathBuf> {
    let cwd = std::env::current_dir().context("Failed to read working directory")?;
    let expanded = utils::path::expand_tilde(&cli.config);
    Ok(find_config_file(&expanded, &cwd).unwrap_or(expanded))
}
