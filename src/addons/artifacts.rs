//! Artifacts upload addon.
//!
//! Emits a block that uploads build artifacts to a bucket with the
//! `artifacts` CLI. The block only runs on non pull request builds of one
//! branch, and every command in it is best-effort: a failed upload never
//! fails the build.
//!
//! Emitted structure for a complete config:
//!
//! ```text
//! if <not a PR and on branch>
//!   echo "Uploading Artifacts (beta)"
//!   fold artifacts.0
//!     install the CLI
//!     export ARTIFACTS_* for every config key
//!     PATH=$HOME/bin:$PATH
//!   fold artifacts.1
//!     artifacts upload <options>
//!   echo "Done uploading artifacts"
//! ```
//!
//! When `key`, `secret` or `bucket` is missing, the block holds one
//! diagnostic per missing credential and nothing else.

use tracing::{debug, info, warn};

use super::{Addon, AddonOutcome};
use crate::config::RawConfig;
use crate::limits::SystemLimits;
use crate::resolve::{resolve, ExportedVar, ResolvedConfig};
use crate::script::{CommandOptions, ScriptEmitter};
use crate::template;
use crate::types::Credential;

/// Uploads artifacts after the job's script has run.
#[derive(Debug, Clone)]
pub struct ArtifactsAddon {
    config: RawConfig,
    limits: SystemLimits,
}

impl ArtifactsAddon {
    /// Create the addon, taking upload limits from the process environment.
    pub fn new(config: RawConfig) -> Self {
        Self {
            config,
            limits: SystemLimits::from_env(),
        }
    }

    /// Replace the environment-derived limits.
    pub fn with_limits(mut self, limits: SystemLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn config(&self) -> &RawConfig {
        &self.config
    }

    pub fn limits(&self) -> &SystemLimits {
        &self.limits
    }

    /// Final configuration the block is compiled from
    pub fn resolve(&self) -> ResolvedConfig {
        resolve(&self.config, &self.limits)
    }
}

impl Addon for ArtifactsAddon {
    fn name(&self) -> &'static str {
        "artifacts"
    }

    fn after_script(&self, script: &mut dyn ScriptEmitter) -> AddonOutcome {
        if self.config.is_empty() {
            debug!("No artifacts configuration, skipping");
            return AddonOutcome::Skipped;
        }

        let resolved = self.resolve();
        let mut outcome = AddonOutcome::Skipped;
        script.conditional(&template::guard(&resolved.branch), &mut |s| {
            outcome = emit_upload(s, &resolved);
        });

        match &outcome {
            AddonOutcome::MissingCredentials(missing) => {
                let names: Vec<&str> = missing.iter().map(Credential::as_str).collect();
                warn!("Artifacts upload disabled, config missing: {}", names.join(", "));
            }
            _ => info!(
                "Artifacts upload compiled for branch {} ({} variables)",
                resolved.branch,
                resolved.exports.len()
            ),
        }
        outcome
    }
}

/// Body of the guarded block.
fn emit_upload(script: &mut dyn ScriptEmitter, resolved: &ResolvedConfig) -> AddonOutcome {
    if !emit_validation(script, &resolved.missing) {
        return AddonOutcome::MissingCredentials(resolved.missing.clone());
    }

    script.command(template::UPLOADING_STATUS, CommandOptions::QUIET);
    script.folded_section(template::INSTALL_FOLD, &mut |s| {
        s.command(template::INSTALL_COMMAND, CommandOptions::QUIET);
        configure_env(s, &resolved.exports);
        s.set_env("PATH", template::PATH_VALUE, CommandOptions::QUIET);
    });
    script.folded_section(template::UPLOAD_FOLD, &mut |s| {
        s.command(
            &template::upload_command(resolved.options.as_deref()),
            CommandOptions::BEST_EFFORT,
        );
    });
    script.command(template::DONE_STATUS, CommandOptions::QUIET);

    AddonOutcome::Compiled
}

/// One diagnostic per missing credential. True when nothing is missing.
fn emit_validation(script: &mut dyn ScriptEmitter, missing: &[Credential]) -> bool {
    for credential in missing {
        script.command(
            &template::missing_credential(*credential),
            CommandOptions::QUIET,
        );
    }
    missing.is_empty()
}

fn configure_env(script: &mut dyn ScriptEmitter, exports: &[ExportedVar]) {
    for var in exports {
        script.set_env(
            &var.name(),
            &var.rendered_value(),
            CommandOptions::QUIET.with_echo(var.echo()),
        );
    }
}
