//! Aspen - a front-end asset pipeline with a live-reloading dev server.

#![allow(dead_code)]

mod cli;
mod config;
mod core;
mod embed;
mod freshness;
mod logger;
mod manifest;
mod reload;
mod task;
mod transform;
mod utils;
mod watch;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::{PipelineConfig, init_config};

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli: &'static Cli = Box::leak(Box::new(Cli::parse()));

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = init_config(PipelineConfig::load(cli)?);

    match cli.command() {
        Commands::Build { .. } => cli::build::run(&config),
        Commands::Serve { serve_args } => cli::serve::run(config, serve_args.target),
        Commands::Clean => task::clean::run(&config),
        Commands::Inject => task::Task::Inject.run().map(|_| ()),
    }
}
