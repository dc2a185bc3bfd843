//! Artifacts Addon Library
//!
//! Compiles a job's artifact upload configuration into a guarded block of
//! build script commands.

pub mod addons;
pub mod cli;
pub mod config;
pub mod error;
pub mod limits;
pub mod resolve;
pub mod script;
pub mod template;
pub mod types;

// Re-export main types for convenience
pub use addons::{Addon, AddonOutcome, ArtifactsAddon};
pub use config::RawConfig;
pub use error::{AddonError, Result};
pub use limits::SystemLimits;
pub use resolve::{check_credentials, resolve, validate, ExportedVar, ResolvedConfig};
pub use script::{BashScript, CommandOptions, Emission, Recorder, ScriptEmitter};
pub use types::{ConfigValue, Credential};
