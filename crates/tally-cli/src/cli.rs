//! CLI command definitions and argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tally_llm::anthropic::DEFAULT_MODEL;

/// Tally CLI - Extract metrics from document batches into spreadsheets.
#[derive(Debug, Parser)]
#[command(name = "tally")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Raise log verbosity to debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Print results as JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a batch extraction over a set of documents
    Run(RunArgs),

    /// Parse and display a metric specification without running anything
    Schema(SchemaArgs),
}

/// Arguments for the run command.
#[derive(Debug, Parser)]
pub struct RunArgs {
    /// Metric specification file (one metric per line)
    #[arg(short, long)]
    pub metrics: PathBuf,

    /// Output directory for the generated artifact
    #[arg(short, long, default_value = "outputs")]
    pub out: PathBuf,

    /// Model to request from the analysis backend
    #[arg(long, default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Override the analysis API endpoint
    #[arg(long)]
    pub endpoint: Option<String>,

    /// API key for the analysis backend
    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Documents to process (PDF files)
    #[arg(required = true)]
    pub documents: Vec<PathBuf>,
}

/// Arguments for the schema command.
#[derive(Debug, Parser)]
pub struct SchemaArgs {
    /// Metric specification file (one metric per line)
    #[arg(short, long)]
    pub metrics: PathBuf,
}
