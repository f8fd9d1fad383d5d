//! User-facing filesystem locations.

use std::path::PathBuf;

use crate::consts::APP_NAME;

/// Returns the user's home directory.
pub fn home_dir() -> PathBuf {
  dirs::home_dir().unwrap_or_else(|| PathBuf::from("/"))
}

/// Default parent directory for source trees and collected binaries.
pub fn default_build_root() -> PathBuf {
  home_dir().join("Downloads").join("node-builds")
}

/// User-local cargo bin directory (rustup installs here).
pub fn cargo_bin_dir() -> PathBuf {
  home_dir().join(".cargo").join("bin")
}

/// Path of the optional settings override file.
pub fn settings_file() -> PathBuf {
  config_dir().join("config.toml")
}

fn config_dir() -> PathBuf {
  dirs::config_dir()
    .unwrap_or_else(|| home_dir().join(".config"))
    .join(APP_NAME)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn default_build_root_is_under_home() {
    assert!(default_build_root().starts_with(home_dir()));
  }

  #[test]
  fn settings_file_is_namespaced() {
    assert!(settings_file().to_string_lossy().contains(APP_NAME));
  }
}
