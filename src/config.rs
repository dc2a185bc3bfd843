//! Raw addon configuration as the job supplies it.
//!
//! `RawConfig` is an ordered key/value mapping. Order is kept because it
//! decides the order environment variables are exported in.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::{AddonError, Result};
use crate::types::ConfigValue;

/// Caller-supplied configuration, in the order keys were given.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawConfig {
    entries: Vec<(String, ConfigValue)>,
}

impl RawConfig {
    /// Create an empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)?;
        Self::from_json_str(&content)
    }

    /// Parse configuration from JSON text. The top level must be an object.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content)?;
        Self::from_json_value(&value)
    }

    /// Build configuration from an already parsed JSON value.
    pub fn from_json_value(value: &Value) -> Result<Self> {
        let Value::Object(map) = value else {
            return Err(AddonError::config(
                "artifacts configuration must be a JSON object",
            ));
        };

        let mut config = Self::new();
        for (key, raw) in map {
            if let Some(value) = ConfigValue::from_json(key, raw)? {
                config.insert(key.clone(), value);
            }
        }
        Ok(config)
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Set a key. An existing key keeps its position and takes the new value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ConfigValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<ConfigValue>> FromIterator<(K, V)> for RawConfig {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut config = Self::new();
        for (k, v) in iter {
            config.insert(k, v);
        }
        config
    }
}
