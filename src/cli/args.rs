//! Command-line interface definitions.

use crate::group::AssetKind;
use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Build-time style-sheet and script optimizer
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: resopt.toml)
    #[arg(short = 'C', long, global = true, default_value = "resopt.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Merge, inline and minify every configured group
    #[command(visible_alias = "b")]
    Build {
        #[command(flatten)]
        args: BuildArgs,
    },

    /// Print the assembled groups as JSON without building anything
    #[command(visible_alias = "l")]
    List {
        #[command(flatten)]
        args: ListArgs,
    },
}

/// Build command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct BuildArgs {
    /// Only process one asset type
    #[arg(long, value_enum)]
    pub only: Option<AssetKind>,

    /// Override every group's minify attribute
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub minify: Option<bool>,

    /// Keep processing remaining groups after a failure
    #[arg(short, long)]
    pub keep_going: bool,

    /// Enable verbose output
    #[arg(short = 'V', long)]
    pub verbose: bool,
}

/// List command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct ListArgs {
    /// Only list one asset type
    #[arg(long, value_enum)]
    pub only: Option<AssetKind>,

    /// Pretty-print the JSON output
    #[arg(short, long)]
    pub pretty: bool,

    /// Write the JSON to a file instead of stdout
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}

impl BuildArgs {
    pub fn kinds(&self) -> Vec<AssetKind> {
        selected(self.only)
    }
}

impl ListArgs {
    pub fn kinds(&self) -> Vec<AssetKind> {
        selected(self.only)
    }
}

fn selected(only: Option<AssetKind>) -> Vec<AssetKind> {
    match only {
        Some(kind) => vec![kind],
        None => AssetKind::ALL.to_vec(),
    }
}
