//! Script emission contract.
//!
//! Addons never run commands. They describe them to a `ScriptEmitter`, which
//! turns the description into something a build worker executes (or, in
//! tests, into a recorded tree of emissions).
//!
//! # Design Goals
//!
//! 1. **Narrow Surface**: four operations cover everything an addon needs:
//!    conditionals, folds, commands and exports.
//! 2. **Substitutable**: the same addon code drives `BashScript` in production
//!    and `Recorder` in tests.
//! 3. **Explicit Failure Policy**: every command states whether it is echoed
//!    and whether a failure aborts the build.

pub mod bash;
pub mod recorder;

use serde::Serialize;

pub use bash::BashScript;
pub use recorder::{Emission, Recorder};

/// Per-command logging and failure policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CommandOptions {
    /// Write the command text to the build log before running it
    pub echo: bool,
    /// Fail the build when the command exits non-zero
    pub assert: bool,
}

impl Default for CommandOptions {
    fn default() -> Self {
        Self {
            echo: true,
            assert: true,
        }
    }
}

impl CommandOptions {
    /// Not echoed, never fails the build
    pub const QUIET: Self = Self {
        echo: false,
        assert: false,
    };

    /// Echoed, never fails the build
    pub const BEST_EFFORT: Self = Self {
        echo: true,
        assert: false,
    };

    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    pub fn with_assert(mut self, assert: bool) -> Self {
        self.assert = assert;
        self
    }
}

/// Nested emission body.
pub type Body<'a> = &'a mut dyn FnMut(&mut dyn ScriptEmitter);

/// Sink for script emissions.
///
/// # Contract
///
/// - `conditional()`: `guard` is written verbatim and evaluated by the shell
///   at build time; `body` emits the guarded commands.
/// - `folded_section()`: groups `body` under a collapsible log section named `id`.
/// - `command()`: one shell command, with its echo/assert policy.
/// - `set_env()`: one export, with the same policy.
pub trait ScriptEmitter {
    fn conditional(&mut self, guard: &str, body: Body<'_>);

    fn command(&mut self, text: &str, options: CommandOptions);

    fn folded_section(&mut self, id: &str, body: Body<'_>);

    fn set_env(&mut self, name: &str, value: &str, options: CommandOptions);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_echo_and_assert() {
        let options = CommandOptions::default();
        assert!(options.echo);
        assert!(options.assert);
    }

    #[test]
    fn test_named_policies() {
        assert_eq!(
            CommandOptions::default().with_echo(false).with_assert(false),
            CommandOptions::QUIET
        );
        assert_eq!(
            CommandOptions::default().with_assert(false),
            CommandOptions::BEST_EFFORT
        );
    }
}
