use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::limits::is_valid_max_size;

/// Artifacts addon - compile artifact upload config into build script commands
#[derive(Parser)]
#[command(name = "artifacts-addon")]
#[command(about = "Compiles artifact upload configuration into a guarded shell script block")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compile a configuration file into script commands
    Compile {
        /// Path to the JSON artifacts configuration
        config: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Bash)]
        format: OutputFormat,

        /// Write output to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Upload concurrency (overrides ARTIFACTS_CONCURRENCY)
        #[arg(long)]
        concurrency: Option<u32>,

        /// Maximum upload size in bytes (overrides ARTIFACTS_MAX_SIZE)
        #[arg(long, value_parser = parse_max_size)]
        max_size: Option<f64>,
    },
    /// Check a configuration file for missing credentials
    Validate {
        /// Path to the JSON artifacts configuration
        config: PathBuf,
    },
}

/// How compiled output is written
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Bash script fragment
    Bash,
    /// Recorded emission tree as JSON
    Json,
}

fn parse_max_size(raw: &str) -> Result<f64, String> {
    let value: f64 = raw.parse().map_err(|e| format!("{}", e))?;
    if is_valid_max_size(value) {
        Ok(value)
    } else {
        Err(format!("{} is not a finite, non-negative size", raw))
    }
}

impl Cli {
    pub fn parse_args() -> Self {
        <Self as clap::Parser>::parse()
    }
}
