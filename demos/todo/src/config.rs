//! Configuration for the `todo` binary.
//!
//! Loads configuration from environment variables (and an optional `.env`
//! file) with sensible defaults. The library types never read the
//! environment themselves; only the binary calls [`TodoConfig::from_env`].

use std::env;
use std::path::PathBuf;
use thiserror::Error;

/// Directory holding slot files when `TODO_DATA_DIR` is unset
pub const DEFAULT_DATA_DIR: &str = ".todo";

/// Slot name when `TODO_SLOT` is unset
pub const DEFAULT_SLOT: &str = "todos-jquery";

/// Log filter when neither `RUST_LOG` nor `TODO_LOG` is set
pub const DEFAULT_LOG_FILTER: &str = "todo=info,tasklist_runtime=info";

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The slot name is empty or would escape the data directory
    #[error("invalid slot name {0:?}: must be non-empty and contain no path separators")]
    InvalidSlot(String),

    /// The data directory is empty
    #[error("TODO_DATA_DIR must not be empty")]
    EmptyDataDir,
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoConfig {
    /// Directory for slot files
    pub data_dir: PathBuf,
    /// Name of the slot holding the list
    pub slot: String,
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for TodoConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            slot: DEFAULT_SLOT.to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl TodoConfig {
    /// Load configuration from the process environment
    ///
    /// Reads `TODO_DATA_DIR`, `TODO_SLOT` and `TODO_LOG` after loading `.env`
    /// if one exists.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a value is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "Loaded .env");
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a value is present but invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            data_dir: lookup("TODO_DATA_DIR").map_or(defaults.data_dir, PathBuf::from),
            slot: lookup("TODO_SLOT").unwrap_or(defaults.slot),
            log_filter: lookup("TODO_LOG").unwrap_or(defaults.log_filter),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check values the storage layer relies on
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an empty data dir or a bad slot name.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::EmptyDataDir);
        }
        let slot = self.slot.trim();
        if slot.is_empty() || slot != self.slot || slot.contains(['/', '\\']) || slot == ".." {
            return Err(ConfigError::InvalidSlot(self.slot.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Test code can use unwrap

    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = TodoConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, TodoConfig::default());
        assert_eq!(config.slot, "todos-jquery");
    }

    #[test]
    fn values_from_lookup() {
        let config = TodoConfig::from_lookup(lookup(&[
            ("TODO_DATA_DIR", "/tmp/lists"),
            ("TODO_SLOT", "work"),
            ("TODO_LOG", "todo=debug"),
        ]))
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/lists"));
        assert_eq!(config.slot, "work");
        assert_eq!(config.log_filter, "todo=debug");
    }

    #[test]
    fn rejects_bad_slots() {
        for slot in ["", "  ", "../etc", "a/b", "a\\b", "..", " padded"] {
            assert_eq!(
                TodoConfig::from_lookup(lookup(&[("TODO_SLOT", slot)])),
                Err(ConfigError::InvalidSlot(slot.to_string())),
                "slot {slot:?}"
            );
        }
    }

    #[test]
    fn rejects_empty_data_dir() {
        assert_eq!(
            TodoConfig::from_lookup(lookup(&[("TODO_DATA_DIR", "")])),
            Err(ConfigError::EmptyDataDir)
        );
    }
}
