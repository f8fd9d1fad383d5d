//! Build settings: repository URLs, output locations, and the Homebrew
//! package list.
//!
//! Everything here is configuration data with shipped defaults; a TOML file
//! at `~/.config/nodeforge/config.toml` overrides individual fields. Nothing
//! downstream hard-codes these values.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::platform::paths;

/// Errors that can occur while loading the settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
  /// The settings file exists but could not be read.
  #[error("failed to read settings file '{0}': {1}")]
  Read(PathBuf, #[source] std::io::Error),

  /// The settings file is not valid TOML (or has unknown fields).
  #[error("failed to parse settings file '{0}': {1}")]
  Parse(PathBuf, #[source] toml::de::Error),
}

/// Application settings.
///
/// Fields missing from the override file keep their shipped default, so a
/// user file only needs the fields it changes.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
  /// Upstream git repository for Bitcoin Core.
  pub bitcoin_repo: String,

  /// Upstream git repository for electrs.
  pub electrs_repo: String,

  /// GitHub releases API endpoint for Bitcoin Core.
  pub bitcoin_api: String,

  /// GitHub releases API endpoint for electrs.
  pub electrs_api: String,

  /// Parent directory for source trees and collected binaries.
  pub build_root: PathBuf,

  /// Homebrew packages a node-only Bitcoin + electrs build needs.
  pub brew_packages: Vec<String>,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      bitcoin_repo: "https://github.com/bitcoin/bitcoin.git".to_string(),
      electrs_repo: "https://github.com/romanz/electrs.git".to_string(),
      bitcoin_api: "https://api.github.com/repos/bitcoin/bitcoin/releases".to_string(),
      electrs_api: "https://api.github.com/repos/romanz/electrs/releases".to_string(),
      build_root: paths::default_build_root(),
      brew_packages: [
        "automake",
        "libtool",
        "pkg-config",
        "boost",
        "zeromq",
        "sqlite",
        "cmake",
        "llvm",
        "libevent",
        "rocksdb",
        "rust",
        "git",
      ]
      .iter()
      .map(|s| s.to_string())
      .collect(),
    }
  }
}

impl Settings {
  /// Load settings from the default location, falling back to defaults when
  /// no override file exists.
  pub fn load() -> Result<Self, SettingsError> {
    Self::load_from(&paths::settings_file())
  }

  /// Load settings from `path`; a missing file yields the defaults.
  pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
    if !path.exists() {
      debug!(path = %path.display(), "no settings file, using defaults");
      return Ok(Self::default());
    }

    let text = fs::read_to_string(path).map_err(|e| SettingsError::Read(path.to_path_buf(), e))?;
    let settings = toml::from_str(&text).map_err(|e| SettingsError::Parse(path.to_path_buf(), e))?;
    debug!(path = %path.display(), "settings loaded");
    Ok(settings)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  #[test]
  fn defaults_point_at_upstream() {
    let settings = Settings::default();
    assert!(settings.bitcoin_repo.ends_with("bitcoin.git"));
    assert!(settings.electrs_repo.ends_with("electrs.git"));
    assert!(!settings.brew_packages.is_empty());
  }

  #[test]
  fn missing_file_yields_defaults() {
    let temp = TempDir::new().unwrap();
    let settings = Settings::load_from(&temp.path().join("config.toml")).unwrap();
    assert_eq!(settings, Settings::default());
  }

  #[test]
  fn partial_override_keeps_other_defaults() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    std::fs::write(&path, "build_root = \"/tmp/elsewhere\"\nbrew_packages = [\"git\"]\n").unwrap();

    let settings = Settings::load_from(&path).unwrap();
    assert_eq!(settings.build_root, PathBuf::from("/tmp/elsewhere"));
    assert_eq!(settings.brew_packages, vec!["git".to_string()]);
    assert_eq!(settings.bitcoin_repo, Settings::default().bitcoin_repo);
  }

  #[test]
  fn unknown_field_is_rejected() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    std::fs::write(&path, "no_such_field = 1\n").unwrap();

    assert!(matches!(Settings::load_from(&path), Err(SettingsError::Parse(..))));
  }
}
