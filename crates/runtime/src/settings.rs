use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A typed value a setting can hold. Settings are registered with a default
/// before first use; reading or writing a key with the wrong type is a
/// programmer error (`expect`-level, not a recoverable `Result`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Str(String),
    Int(i64),
}

impl Value {
    fn kind(&self) -> &'static str {
        match self {
            Value::Str(_) => "str",
            Value::Int(_) => "int",
        }
    }
}

/// A small persisted key-value store, backed by a TOML file on disk.
///
/// Keys must be `register`-ed with a default value before they can be read
/// or written; this mirrors the source daemon's `settings.register(name,
/// type, default)` idiom without reaching for dynamic typing.
#[derive(Debug, Default)]
pub struct Settings {
    path: Option<PathBuf>,
    values: BTreeMap<String, Value>,
}

impl Settings {
    /// Create an in-memory settings store with no backing file (used by
    /// tests and by `--test` mode).
    pub fn in_memory() -> Self {
        Self {
            path: None,
            values: BTreeMap::new(),
        }
    }

    /// Load settings from `path`, creating an empty store if the file does
    /// not exist yet.
    pub fn load(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path: Some(path),
            values,
        })
    }

    /// Register `key` with `default` if it is not already present (either
    /// freshly loaded from disk, or from a prior `register` call).
    pub fn register(&mut self, key: &str, default: Value) {
        self.values.entry(key.to_string()).or_insert(default);
    }

    pub fn get(&self, key: &str) -> &Value {
        self.values
            .get(key)
            .unwrap_or_else(|| panic!("setting {key:?} was read before being registered"))
    }

    pub fn get_str(&self, key: &str) -> &str {
        match self.get(key) {
            Value::Str(s) => s,
            other => panic!("setting {key:?} is a {}, not a str", other.kind()),
        }
    }

    pub fn get_int(&self, key: &str) -> i64 {
        match self.get(key) {
            Value::Int(i) => *i,
            other => panic!("setting {key:?} is a {}, not an int", other.kind()),
        }
    }

    /// Overwrite `key`'s value, keeping its previously registered type.
    pub fn set(&mut self, key: &str, value: Value) {
        if let Some(existing) = self.values.get(key) {
            assert_eq!(
                existing.kind(),
                value.kind(),
                "setting {key:?} changed type from {} to {}",
                existing.kind(),
                value.kind()
            );
        }
        self.values.insert(key.to_string(), value);
    }

    pub fn set_str(&mut self, key: &str, value: impl Into<String>) {
        self.set(key, Value::Str(value.into()));
    }

    pub fn set_int(&mut self, key: &str, value: i64) {
        self.set(key, Value::Int(value));
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Persist the current values back to the backing file, if any.
    pub fn save(&self) -> anyhow::Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(&self.values)?;
        fs::write(path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
