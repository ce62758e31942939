//! Marina CLI - inspect the bundler configurations a project resolves to

use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use marina::InspectError;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        report(e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("marina=debug")
    } else {
        EnvFilter::new("marina=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    match cli.command {
        Commands::Inspect(args) => commands::inspect::execute(args),
    }
}

/// Print a fatal error to stderr.
fn report(err: anyhow::Error) {
    let color = std::io::stderr().is_terminal();
    match err.downcast::<InspectError>() {
        Ok(InspectError::DescriptorEvaluation(err)) => {
            eprintln!("{:?}", miette::Report::new(err));
        }
        Ok(err) => eprint!("{}", err.to_diagnostic().render(color)),
        Err(err) => eprintln!("error: {:#}", err),
    }
}
