//! Build script addons.
//!
//! An addon contributes commands to a build script at a fixed point of the
//! script's lifecycle. The surrounding compiler owns the script; addons only
//! describe what to add through a `ScriptEmitter`.

pub mod artifacts;

use serde::Serialize;

use crate::script::ScriptEmitter;
use crate::types::Credential;

pub use artifacts::ArtifactsAddon;

/// What an addon did when its hook ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "missing", rename_all = "snake_case")]
pub enum AddonOutcome {
    /// Nothing configured, nothing emitted
    Skipped,
    /// Guard and diagnostics emitted, upload suppressed
    MissingCredentials(Vec<Credential>),
    /// Full block emitted
    Compiled,
}

impl AddonOutcome {
    pub fn is_compiled(&self) -> bool {
        matches!(self, AddonOutcome::Compiled)
    }
}

/// Lifecycle hooks a build script compiler invokes on its addons.
pub trait Addon {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Whether the emitted commands need root on the build worker
    fn requires_super_user(&self) -> bool {
        false
    }

    /// Runs once, after the job's own script steps were emitted.
    fn after_script(&self, script: &mut dyn ScriptEmitter) -> AddonOutcome;
}
