//! Typed configuration values for the artifacts addon
//!
//! Job configuration arrives as loosely typed JSON. This module narrows it to
//! the value shapes the addon understands and names the credentials it
//! requires.

use serde::Serialize;
use serde_json::Value;
use strum::{Display, EnumIter, EnumString};

use crate::error::{AddonError, Result};

/// A single configuration value.
///
/// Sequences hold their items already rendered as strings; the addon only
/// ever joins them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    List(Vec<String>),
}

impl ConfigValue {
    /// Narrow a JSON value to a config value.
    ///
    /// Returns `Ok(None)` for `null`, which callers treat as an absent key.
    /// Nested objects and nested arrays are rejected.
    pub fn from_json(key: &str, value: &Value) -> Result<Option<Self>> {
        let converted = match value {
            Value::Null => return Ok(None),
            Value::Bool(b) => ConfigValue::Bool(*b),
            Value::Number(n) => number_value(n),
            Value::String(s) => ConfigValue::Text(s.clone()),
            Value::Array(items) => {
                let rendered = items
                    .iter()
                    .map(|item| scalar_string(key, item))
                    .collect::<Result<Vec<_>>>()?;
                ConfigValue::List(rendered)
            }
            Value::Object(_) => {
                return Err(AddonError::config(format!(
                    "key '{}' holds a nested object; expected a string, number, boolean or list",
                    key
                )));
            }
        };
        Ok(Some(converted))
    }

    /// Render the value as an environment variable value.
    ///
    /// Lists are joined with `;`, the separator the upload tool splits on.
    pub fn to_env_value(&self) -> String {
        match self {
            ConfigValue::List(items) => items.join(";"),
            other => other.scalar_text(),
        }
    }

    /// Render the value for inline use on a command line.
    ///
    /// Lists are joined with spaces so `["--a", "--b"]` becomes `--a --b`.
    pub fn to_inline(&self) -> String {
        match self {
            ConfigValue::List(items) => items.join(" "),
            other => other.scalar_text(),
        }
    }

    /// Whether the value counts as set. Only boolean `false` does not.
    pub fn is_present(&self) -> bool {
        !matches!(self, ConfigValue::Bool(false))
    }

    fn scalar_text(&self) -> String {
        match self {
            ConfigValue::Text(s) => s.clone(),
            ConfigValue::Integer(i) => i.to_string(),
            ConfigValue::Float(f) => format_float(*f),
            ConfigValue::Bool(b) => b.to_string(),
            ConfigValue::List(items) => items.join(";"),
        }
    }
}

impl std::fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_env_value())
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::Text(s.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue::Text(s)
    }
}

impl From<i64> for ConfigValue {
    fn from(i: i64) -> Self {
        ConfigValue::Integer(i)
    }
}

impl From<f64> for ConfigValue {
    fn from(f: f64) -> Self {
        ConfigValue::Float(f)
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        ConfigValue::Bool(b)
    }
}

impl From<Vec<&str>> for ConfigValue {
    fn from(items: Vec<&str>) -> Self {
        ConfigValue::List(items.into_iter().map(str::to_string).collect())
    }
}

/// Render a float, keeping a trailing `.0` on integral values (`5242880.0`).
pub fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

fn number_value(n: &serde_json::Number) -> ConfigValue {
    if let Some(i) = n.as_i64() {
        ConfigValue::Integer(i)
    } else {
        // u64 beyond i64::MAX or a real float
        ConfigValue::Float(n.as_f64().unwrap_or(f64::NAN))
    }
}

fn scalar_string(key: &str, item: &Value) -> Result<String> {
    match item {
        Value::Null => Ok(String::new()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(number_value(n).to_env_value()),
        Value::String(s) => Ok(s.clone()),
        Value::Array(_) | Value::Object(_) => Err(AddonError::config(format!(
            "key '{}' holds a nested collection; list items must be scalars",
            key
        ))),
    }
}

/// Credentials the upload tool cannot run without.
///
/// Variant order is the order they are checked and reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[derive(Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Credential {
    Key,
    Secret,
    Bucket,
}

impl Credential {
    /// The config key this credential is read from.
    pub fn as_str(&self) -> &'static str {
        match self {
            Credential::Key => "key",
            Credential::Secret => "secret",
            Credential::Bucket => "bucket",
        }
    }
}
