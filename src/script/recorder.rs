//! Emitter that records what was emitted instead of rendering it.

use serde::Serialize;

use super::{Body, CommandOptions, ScriptEmitter};
use crate::error::Result;

/// One recorded emission.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Emission {
    Command {
        text: String,
        echo: bool,
        assert: bool,
    },
    SetEnv {
        name: String,
        value: String,
        echo: bool,
        assert: bool,
    },
    Fold {
        id: String,
        body: Vec<Emission>,
    },
    Conditional {
        guard: String,
        body: Vec<Emission>,
    },
}

impl Emission {
    pub fn body(&self) -> &[Emission] {
        match self {
            Emission::Fold { body, .. } | Emission::Conditional { body, .. } => body.as_slice(),
            _ => &[],
        }
    }
}

/// Records emissions as a tree mirroring the nesting of the calls.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recorder {
    emissions: Vec<Emission>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Top-level emissions
    pub fn emissions(&self) -> &[Emission] {
        &self.emissions
    }

    pub fn is_empty(&self) -> bool {
        self.emissions.is_empty()
    }

    /// Commands and exports in emission order, with folds and conditionals
    /// flattened away.
    pub fn leaves(&self) -> Vec<&Emission> {
        let mut out = Vec::new();
        collect_leaves(&self.emissions, &mut out);
        out
    }

    /// Text of every command, in order
    pub fn commands(&self) -> Vec<&str> {
        self.leaves()
            .into_iter()
            .filter_map(|emission| match emission {
                Emission::Command { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// `(name, value)` of every export, in order
    pub fn env_vars(&self) -> Vec<(&str, &str)> {
        self.leaves()
            .into_iter()
            .filter_map(|emission| match emission {
                Emission::SetEnv { name, value, .. } => Some((name.as_str(), value.as_str())),
                _ => None,
            })
            .collect()
    }

    /// First export of `name`
    pub fn find_env(&self, name: &str) -> Option<&Emission> {
        self.leaves()
            .into_iter()
            .find(|emission| matches!(emission, Emission::SetEnv { name: n, .. } if n == name))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.emissions)?)
    }
}

fn record_nested(body: Body<'_>) -> Vec<Emission> {
    let mut child = Recorder::new();
    body(&mut child);
    child.emissions
}

fn collect_leaves<'a>(emissions: &'a [Emission], out: &mut Vec<&'a Emission>) {
    for emission in emissions {
        match emission {
            Emission::Fold { body, .. } | Emission::Conditional { body, .. } => {
                collect_leaves(body, out)
            }
            leaf => out.push(leaf),
        }
    }
}

impl ScriptEmitter for Recorder {
    fn conditional(&mut self, guard: &str, body: Body<'_>) {
        let body = record_nested(body);
        self.emissions.push(Emission::Conditional {
            guard: guard.to_string(),
            body,
        });
    }

    fn command(&mut self, text: &str, options: CommandOptions) {
        self.emissions.push(Emission::Command {
            text: text.to_string(),
            echo: options.echo,
            assert: options.assert,
        });
    }

    fn folded_section(&mut self, id: &str, body: Body<'_>) {
        let body = record_nested(body);
        self.emissions.push(Emission::Fold {
            id: id.to_string(),
            body,
        });
    }

    fn set_env(&mut self, name: &str, value: &str, options: CommandOptions) {
        self.emissions.push(Emission::SetEnv {
            name: name.to_string(),
            value: value.to_string(),
            echo: options.echo,
            assert: options.assert,
        });
    }
}
