//! Artifacts addon - Main entry point
//!
//! Compiles an artifacts configuration file into the script block a build
//! worker runs after the job's own steps.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use artifacts_addon::cli::{Cli, Commands, OutputFormat};
use artifacts_addon::{
    check_credentials, Addon, ArtifactsAddon, BashScript, RawConfig, Recorder, SystemLimits,
};

/// Initialize logging. `RUST_LOG` overrides the default `info` level.
/// Logs go to stderr; stdout carries only the compiled script.
fn init_logger() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Main application entry point
fn main() -> Result<()> {
    init_logger();

    let cli = Cli::parse_args();
    debug!("CLI arguments parsed");

    match cli.command {
        Commands::Compile {
            config,
            format,
            output,
            concurrency,
            max_size,
        } => {
            let mut limits = SystemLimits::from_env();
            if let Some(concurrency) = concurrency {
                limits = limits.with_concurrency(concurrency);
            }
            if let Some(max_size) = max_size {
                limits = limits.with_max_size(max_size);
            }
            run_compile(&config, format, output.as_deref(), limits)?;
        }
        Commands::Validate { config } => {
            run_validate(&config)?;
        }
    }

    Ok(())
}

fn load_config(path: &Path) -> Result<RawConfig> {
    RawConfig::load_from_file(path)
        .with_context(|| format!("Failed to load configuration from {:?}", path))
}

/// Compile the addon block and write it out
fn run_compile(
    config_path: &Path,
    format: OutputFormat,
    output: Option<&Path>,
    limits: SystemLimits,
) -> Result<()> {
    info!("Compiling artifacts configuration: {:?}", config_path);
    let addon = ArtifactsAddon::new(load_config(config_path)?).with_limits(limits);

    let (rendered, outcome) = match format {
        OutputFormat::Bash => {
            let mut script = BashScript::new();
            let outcome = addon.after_script(&mut script);
            (script.finish(), outcome)
        }
        OutputFormat::Json => {
            let mut recorder = Recorder::new();
            let outcome = addon.after_script(&mut recorder);
            (format!("{}\n", recorder.to_json()?), outcome)
        }
    };
    debug!("Addon outcome: {:?}", outcome);

    match output {
        Some(path) => {
            fs::write(path, &rendered)
                .with_context(|| format!("Failed to write script to {:?}", path))?;
            info!("Wrote {} bytes to {:?}", rendered.len(), path);
        }
        None => print!("{}", rendered),
    }
    Ok(())
}

/// Report missing credentials; exit non-zero when any are missing
fn run_validate(config_path: &Path) -> Result<()> {
    info!("Validating configuration file: {:?}", config_path);
    let raw = match load_config(config_path) {
        Ok(raw) => raw,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("✗ {:#}", e);
            std::process::exit(1);
        }
    };

    if raw.is_empty() {
        println!("✓ No artifacts configured; nothing will be uploaded");
        return Ok(());
    }

    match check_credentials(&raw) {
        Ok(()) => {
            println!("✓ Configuration file is valid: {:?}", config_path);
            Ok(())
        }
        Err(e) => {
            error!("Configuration validation failed: {}", e);
            eprintln!("✗ {}", e);
            std::process::exit(1);
        }
    }
}
