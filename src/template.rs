//! Shell text for the artifacts block.
//!
//! All shell syntax the addon produces is built here by small pure
//! functions, so the rest of the crate only deals in resolved values.

use crate::types::Credential;

/// Prefix of every variable exported for the upload tool
pub const ENV_PREFIX: &str = "ARTIFACTS_";

/// Fold holding install and configuration steps
pub const INSTALL_FOLD: &str = "artifacts.0";

/// Fold holding the upload itself
pub const UPLOAD_FOLD: &str = "artifacts.1";

pub const INSTALL_COMMAND: &str =
    "curl -sL https://raw.githubusercontent.com/meatballhat/artifacts/master/install | bash";

/// The install script drops the binary in `$HOME/bin`
pub const PATH_VALUE: &str = "$HOME/bin:$PATH";

pub const UPLOADING_STATUS: &str = r#"echo "Uploading Artifacts (beta)""#;

pub const DONE_STATUS: &str = r#"echo "Done uploading artifacts""#;

const UPLOAD_BINARY: &str = "artifacts upload";

/// Runtime predicate: not a pull request build, and on `branch`.
pub fn guard(branch: &str) -> String {
    format!(
        "($TRAVIS_PULL_REQUEST = false) && ($TRAVIS_BRANCH = {})",
        branch
    )
}

/// Upload invocation with the job's raw flags appended verbatim.
pub fn upload_command(options: Option<&str>) -> String {
    match options {
        Some(opts) if !opts.is_empty() => format!("{} {}", UPLOAD_BINARY, opts),
        _ => UPLOAD_BINARY.to_string(),
    }
}

/// Diagnostic echoed when a credential is absent.
pub fn missing_credential(credential: Credential) -> String {
    format!(r#"echo "Artifacts config missing :{} param""#, credential)
}

/// `PATHS` → `ARTIFACTS_PATHS`
pub fn env_var_name(key: &str) -> String {
    format!("{}{}", ENV_PREFIX, key)
}
