//! CLI definitions using clap.

use clap::{ArgAction, Args, Parser, Subcommand};

use marina::Mode;

/// Marina - inspect the bundler configurations a project resolves to
#[derive(Parser)]
#[command(name = "marina")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Inspect the generated bundler config
    #[command(after_help = "Examples:\n  \
        marina inspect\n  \
        marina inspect -p module.rules\n  \
        marina inspect -p plugins -d 2")]
    Inspect(InspectArgs),
}

#[derive(Args)]
pub struct InspectArgs {
    /// Number of levels deep (default: 5)
    #[arg(short, long, value_name = "DEPTH", allow_negative_numbers = true)]
    pub depth: Option<String>,

    /// Path of config in dot notation (e.g. module.rules, plugins)
    #[arg(short, long)]
    pub path: Option<String>,

    /// Style output with ANSI color codes (default: true)
    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    pub colors: Option<bool>,

    /// Include hidden properties (default: true)
    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    pub show_hidden: Option<bool>,

    /// Build mode to inspect
    #[arg(short, long, default_value = "ssg")]
    pub mode: Mode,

    /// Render each config on a single line (default: false)
    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    pub compact: Option<bool>,

    /// Resolve the config for a debug build
    #[arg(long)]
    pub debug: bool,
}
