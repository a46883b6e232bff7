//! Tally CLI - Command-line interface for batch document metric extraction.

use clap::Parser;
use tally_cli::commands;
use tally_cli::{Cli, Command, Formatter};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    // Create formatter
    let formatter = Formatter::new(!cli.no_color);

    // Handle commands
    match cli.command {
        Command::Run(args) => {
            commands::execute_run(args, &formatter, cli.json).await?;
        }
        Command::Schema(args) => {
            commands::execute_schema(args, &formatter, cli.json)?;
        }
    }

    Ok(())
}

/// Initialize tracing (log to stderr so table output stays pipeable)
fn init_tracing(verbose: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::new(if verbose { "debug" } else { "info" })
        });

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}
