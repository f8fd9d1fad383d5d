//! Homebrew detection.
//!
//! A fixed-path existence probe rather than a `which` lookup: GUI-launched
//! processes on macOS inherit a minimal PATH, so the two standard install
//! prefixes are checked directly.

use std::path::{Path, PathBuf};

/// Candidate Homebrew prefixes, Apple Silicon location first.
pub const PREFIX_CANDIDATES: &[&str] = &["/opt/homebrew", "/usr/local"];

/// A detected Homebrew installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Brew {
  prefix: PathBuf,
}

impl Brew {
  /// Probe the standard install prefixes for a `brew` binary.
  pub fn detect() -> Option<Self> {
    Self::detect_in(PREFIX_CANDIDATES.iter().map(PathBuf::from))
  }

  /// Probe the given prefixes in order; first hit wins.
  pub fn detect_in(candidates: impl IntoIterator<Item = PathBuf>) -> Option<Self> {
    candidates
      .into_iter()
      .find(|prefix| prefix.join("bin").join("brew").is_file())
      .map(|prefix| Self { prefix })
  }

  pub fn prefix(&self) -> &Path {
    &self.prefix
  }

  /// Directory holding `brew` and brew-installed tools.
  pub fn bin_dir(&self) -> PathBuf {
    self.prefix.join("bin")
  }

  /// Full path of the `brew` binary itself.
  pub fn executable(&self) -> PathBuf {
    self.prefix.join("bin").join("brew")
  }

  /// Keg prefix of the LLVM formula, whether or not it is installed.
  pub fn llvm_prefix(&self) -> PathBuf {
    self.prefix.join("opt").join("llvm")
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  fn fake_brew(prefix: &Path) {
    let bin = prefix.join("bin");
    std::fs::create_dir_all(&bin).unwrap();
    std::fs::write(bin.join("brew"), "#!/bin/sh\n").unwrap();
  }

  #[test]
  fn detects_first_candidate_with_brew() {
    let temp = TempDir::new().unwrap();
    let first = temp.path().join("opt/homebrew");
    let second = temp.path().join("usr/local");
    fake_brew(&second);

    let brew = Brew::detect_in([first, second.clone()]).unwrap();
    assert_eq!(brew.prefix(), second);
    assert_eq!(brew.executable(), second.join("bin/brew"));
  }

  #[test]
  fn prefers_earlier_candidate() {
    let temp = TempDir::new().unwrap();
    let first = temp.path().join("a");
    let second = temp.path().join("b");
    fake_brew(&first);
    fake_brew(&second);

    let brew = Brew::detect_in([first.clone(), second]).unwrap();
    assert_eq!(brew.prefix(), first);
  }

  #[test]
  fn absent_brew_detects_nothing() {
    let temp = TempDir::new().unwrap();
    assert!(Brew::detect_in([temp.path().to_path_buf()]).is_none());
  }

  #[test]
  fn llvm_prefix_is_under_opt() {
    let temp = TempDir::new().unwrap();
    fake_brew(temp.path());
    let brew = Brew::detect_in([temp.path().to_path_buf()]).unwrap();
    assert_eq!(brew.llvm_prefix(), temp.path().join("opt/llvm"));
  }
}
