//! KindScript CLI tool.
//!
//! Usage:
//! ```bash
//! ksc check [OPTIONS] [PATH]
//! ksc list-contracts
//! ksc init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_lookup;

/// Architecture contracts for TypeScript projects, declared as types
#[derive(Parser)]
#[command(name = "ksc")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "KINDSCRIPT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check architecture contracts
    Check {
        /// Project directory (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// List available contract types
    ListContracts {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Initialize configuration file
    Init {
        /// Directory to create kindscript.toml in
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for check results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-diagnostic compact format.
    Compact,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check { path, format } => {
            let loaded = config_lookup::ConfigLookup::from_env()
                .load(&path, cli.config.as_deref())?;
            commands::check::run(&path, format, &loaded)
        }
        Commands::ListContracts { format } => commands::list_contracts::run(format),
        Commands::Init { path, force } => commands::init::run(&path, force),
    }
}
