//! Upload limits controlled by the build system, not by the job.
//!
//! Concurrency and maximum upload size come from the environment of the
//! process compiling the script. Whatever a job config says about them is
//! discarded during resolution.

use tracing::warn;

/// Environment variable holding the upload concurrency
pub const CONCURRENCY_ENV: &str = "ARTIFACTS_CONCURRENCY";

/// Environment variable holding the maximum upload size in bytes
pub const MAX_SIZE_ENV: &str = "ARTIFACTS_MAX_SIZE";

pub const DEFAULT_CONCURRENCY: u32 = 5;

/// 5 MiB
pub const DEFAULT_MAX_SIZE: f64 = 5.0 * 1024.0 * 1024.0;

/// System-resolved upload limits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SystemLimits {
    pub concurrency: u32,
    /// Bytes
    pub max_size: f64,
}

impl Default for SystemLimits {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            max_size: DEFAULT_MAX_SIZE,
        }
    }
}

impl SystemLimits {
    /// Read limits from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read limits through an arbitrary lookup.
    ///
    /// Unset variables fall back to the defaults. Values that do not parse
    /// are logged and also fall back; compiling never fails on them.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let concurrency = lookup(CONCURRENCY_ENV)
            .and_then(|raw| parse_concurrency(&raw))
            .unwrap_or(DEFAULT_CONCURRENCY);
        let max_size = lookup(MAX_SIZE_ENV)
            .and_then(|raw| parse_max_size(&raw))
            .unwrap_or(DEFAULT_MAX_SIZE);

        Self {
            concurrency,
            max_size,
        }
    }

    pub fn with_concurrency(mut self, concurrency: u32) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_max_size(mut self, max_size: f64) -> Self {
        self.max_size = max_size;
        self
    }
}

fn parse_concurrency(raw: &str) -> Option<u32> {
    match raw.trim().parse::<u32>() {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(
                "Ignoring {}={:?} ({}), using {}",
                CONCURRENCY_ENV, raw, e, DEFAULT_CONCURRENCY
            );
            None
        }
    }
}

/// A usable upload size: finite and not negative.
pub fn is_valid_max_size(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

fn parse_max_size(raw: &str) -> Option<f64> {
    match raw.trim().parse::<f64>() {
        Ok(value) if is_valid_max_size(value) => Some(value),
        Ok(value) => {
            warn!(
                "Ignoring {}={} (not a non-negative size), using {}",
                MAX_SIZE_ENV, value, DEFAULT_MAX_SIZE
            );
            None
        }
        Err(e) => {
            warn!(
                "Ignoring {}={:?} ({}), using {}",
                MAX_SIZE_ENV, raw, e, DEFAULT_MAX_SIZE
            );
            None
        }
    }
}
