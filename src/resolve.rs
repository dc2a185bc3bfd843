//! Resolution of raw job configuration into the final upload configuration.
//!
//! Resolution is a pure function of the raw config and the system limits:
//!
//! - `concurrency` and `max_size` from the job are dropped and the system
//!   values appended in their place.
//! - `options` is held back for the upload command and never exported.
//! - Reserved keys match regardless of case, since exports are upcased.
//! - `branch` picks the branch the guard compares against.
//! - Every other key is exported, in the order it was given.

use tracing::debug;

use crate::config::RawConfig;
use crate::error::{AddonError, Result};
use crate::limits::SystemLimits;
use crate::template;
use crate::types::{ConfigValue, Credential};

pub const DEFAULT_BRANCH: &str = "master";

const CONCURRENCY_KEY: &str = "concurrency";
const MAX_SIZE_KEY: &str = "max_size";
const OPTIONS_KEY: &str = "options";
const BRANCH_KEY: &str = "branch";

/// Keys whose exports are echoed to the build log. Everything else may hold
/// credentials and stays silent.
const ECHOED_KEYS: &[&str] = &["PATHS"];

/// One variable handed to the upload tool.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedVar {
    /// Upcased config key, without prefix (e.g. `PATHS`)
    pub key: String,
    pub value: ConfigValue,
}

impl ExportedVar {
    fn new(key: &str, value: ConfigValue) -> Self {
        Self {
            key: key.to_uppercase(),
            value,
        }
    }

    /// Full variable name, e.g. `ARTIFACTS_PATHS`
    pub fn name(&self) -> String {
        template::env_var_name(&self.key)
    }

    pub fn rendered_value(&self) -> String {
        self.value.to_env_value()
    }

    pub fn echo(&self) -> bool {
        ECHOED_KEYS.contains(&self.key.as_str())
    }
}

/// Final, internally consistent configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub branch: String,
    /// Raw flags appended to the upload command
    pub options: Option<String>,
    pub exports: Vec<ExportedVar>,
    /// Credentials absent from the raw config, in check order
    pub missing: Vec<Credential>,
}

impl ResolvedConfig {
    pub fn is_valid(&self) -> bool {
        self.missing.is_empty()
    }

    pub fn export(&self, key: &str) -> Option<&ExportedVar> {
        let key = key.to_uppercase();
        self.exports.iter().find(|var| var.key == key)
    }
}

/// Resolve a raw config against the system limits.
pub fn resolve(raw: &RawConfig, limits: &SystemLimits) -> ResolvedConfig {
    let branch = raw
        .get(BRANCH_KEY)
        .filter(|value| value.is_present())
        .map(ConfigValue::to_inline)
        .unwrap_or_else(|| DEFAULT_BRANCH.to_string());

    let options = raw
        .get(OPTIONS_KEY)
        .filter(|value| value.is_present())
        .map(ConfigValue::to_inline);

    let mut exports: Vec<ExportedVar> = raw
        .iter()
        .filter(|(key, _)| !is_withheld(key))
        .map(|(key, value)| ExportedVar::new(key, value.clone()))
        .collect();
    exports.push(ExportedVar::new(
        CONCURRENCY_KEY,
        ConfigValue::Integer(i64::from(limits.concurrency)),
    ));
    exports.push(ExportedVar::new(
        MAX_SIZE_KEY,
        ConfigValue::Float(limits.max_size),
    ));

    let missing = validate(raw);

    debug!(
        "Resolved artifacts config: branch={} exports={:?} missing={:?}",
        branch,
        exports.iter().map(|var| var.key.as_str()).collect::<Vec<_>>(),
        missing
    );

    ResolvedConfig {
        branch,
        options,
        exports,
        missing,
    }
}

fn is_withheld(key: &str) -> bool {
    [CONCURRENCY_KEY, MAX_SIZE_KEY, OPTIONS_KEY]
        .iter()
        .any(|reserved| key.eq_ignore_ascii_case(reserved))
}

/// Check credential presence. Every credential is checked; the result lists
/// all that are missing, in `key`, `secret`, `bucket` order.
pub fn validate(raw: &RawConfig) -> Vec<Credential> {
    [Credential::Key, Credential::Secret, Credential::Bucket]
        .into_iter()
        .filter(|credential| {
            !raw.get(credential.as_str())
                .is_some_and(ConfigValue::is_present)
        })
        .collect()
}

/// Like [`validate`], but fails with a validation error naming every missing
/// credential.
pub fn check_credentials(raw: &RawConfig) -> Result<()> {
    let missing = validate(raw);
    if missing.is_empty() {
        return Ok(());
    }
    let names: Vec<String> = missing.iter().map(|c| format!(":{}", c)).collect();
    Err(AddonError::validation(format!(
        "artifacts config missing {}",
        names.join(", ")
    )))
}
