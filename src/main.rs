//! resopt - build-time style-sheet and script optimizer.
//!
//! Merges the style-sheet and script groups declared in a groups document,
//! inlines referenced images as data URIs and minifies each group into one
//! output file.

mod cli;
mod config;
mod error;
mod group;
mod inline;
mod logger;
mod minify;
mod pipeline;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::ProjectConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = ProjectConfig::load(&cli)?;

    match &cli.command {
        Commands::Build { args } => cli::build::build(&config, args),
        Commands::List { args } => cli::list::list(&config, args),
    }
}
