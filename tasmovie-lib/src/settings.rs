//! Persisted settings (`~/.config/tasmovie/settings.toml`).
//!
//! The file is optional. Missing keys fall back to the built-in defaults,
//! and an unreadable file is reported and then ignored so a bad edit never
//! blocks parsing.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tasmovie_core::{DEFAULT_MAX_ENTRY_BYTES, DEFAULT_MAX_INPUT_BYTES, ParseOptions};

use crate::error::SettingsError;

/// Canonical path to the settings file: `~/.config/tasmovie/settings.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("tasmovie").join("settings.toml")
}

/// Resource bounds applied to every parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub max_input_bytes: u64,
    pub max_entry_bytes: u64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
            max_entry_bytes: DEFAULT_MAX_ENTRY_BYTES,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub limits: Limits,
}

impl Settings {
    /// Parse settings from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(contents)?)
    }

    /// Render the settings as TOML.
    pub fn to_toml_string(&self) -> Result<String, SettingsError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load settings from the canonical path.
    pub fn load() -> Self {
        Self::load_from(&settings_path())
    }

    /// Load settings from `path`, falling back to defaults when the file is
    /// missing or invalid.
    pub fn load_from(path: &Path) -> Self {
        match Self::try_load_from(path) {
            Ok(Some(settings)) => settings,
            Ok(None) => Self::default(),
            Err(e) => {
                log::warn!("Ignoring settings file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Load settings from `path`. Returns `Ok(None)` when the file does not
    /// exist.
    pub fn try_load_from(path: &Path) -> Result<Option<Self>, SettingsError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Self::from_toml_str(&contents).map(Some)
    }

    /// Save settings to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let serialized = self.to_toml_string()?;
        let tmp = path.with_extension("toml.tmp");
        std::fs::write(&tmp, &serialized)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Parse options derived from these settings.
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions::new()
            .max_input_bytes(self.limits.max_input_bytes)
            .max_entry_bytes(self.limits.max_entry_bytes)
    }
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
