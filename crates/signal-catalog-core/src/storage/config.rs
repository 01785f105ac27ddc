//! TOML-based application configuration.
//!
//! Stores the policy windows, triage weights and storage backend defaults.
//! Configuration is stored at `~/.config/signal-catalog/config.toml` and a
//! default file is written on first load.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::ConfigError;
use crate::reports::triage::TriageWeights;

/// Date-policy thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Forward window for due-soon classification (days).
    #[serde(default = "default_due_soon_days")]
    pub due_soon_days: u32,
    /// Days without an update before an open signal counts as stale.
    #[serde(default = "default_stale_days")]
    pub stale_days: u32,
    /// Lookahead horizon for the calendar report (days).
    #[serde(default = "default_calendar_horizon_days")]
    pub calendar_horizon_days: u32,
}

/// Storage backend defaults, overridable by flags and environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// `sqlite` or `postgres`.
    #[serde(default = "default_backend")]
    pub backend: String,
    /// Table name used by the Postgres backend.
    #[serde(default = "default_table")]
    pub table: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/signal-catalog/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub policy: PolicyConfig,
    #[serde(default)]
    pub triage: TriageWeights,
    #[serde(default)]
    pub storage: StorageConfig,
}

fn default_due_soon_days() -> u32 {
    7
}
fn default_stale_days() -> u32 {
    14
}
fn default_calendar_horizon_days() -> u32 {
    28
}
fn default_backend() -> String {
    "sqlite".to_string()
}
fn default_table() -> String {
    "signals".to_string()
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            due_soon_days: default_due_soon_days(),
            stale_days: default_stale_days(),
            calendar_horizon_days: default_calendar_horizon_days(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            table: default_table(),
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf, std::io::Error> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or write and return the default.
    ///
    /// # Errors
    /// Returns an error if an existing file cannot be parsed, if the triage
    /// weights are invalid, or if the default cannot be written.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config/signal-catalog"),
            message: e.to_string(),
        })?;
        let cfg = match std::fs::read_to_string(&path) {
            Ok(content) => {
                toml::from_str::<Config>(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.clone(),
                    message: e.to_string(),
                })?
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                cfg
            }
        };
        cfg.triage
            .validate()
            .map_err(|message| ConfigError::InvalidValue {
                key: "triage".to_string(),
                message,
            })?;
        Ok(cfg)
    }

    /// Persist to disk.
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path().map_err(|e| ConfigError::SaveFailed {
            path: PathBuf::from("~/.config/signal-catalog"),
            message: e.to_string(),
        })?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Load from disk, returning the default on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.policy.due_soon_days, 7);
        assert_eq!(parsed.policy.stale_days, 14);
        assert_eq!(parsed.storage.backend, "sqlite");
        assert_eq!(parsed.storage.table, "signals");
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let parsed: Config = toml::from_str("[policy]\nstale_days = 30\n").unwrap();
        assert_eq!(parsed.policy.stale_days, 30);
        assert_eq!(parsed.policy.due_soon_days, 7);
        assert_eq!(parsed.storage.backend, "sqlite");
    }
}
