//! Project builders and the shared build lifecycle types.
//!
//! A builder run moves through source acquisition, configure (Bitcoin Core
//! only), compile, and collection. The first failing step maps to a terminal
//! [`BuildError`] carrying the phase it interrupted and, for shelled-out
//! steps, the original command string. Nothing is rolled back; intermediate
//! files stay on disk for inspection and retry.

pub mod bitcoin;
pub mod electrs;
pub mod source;

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::collect::CollectError;
use crate::runner::RunError;

/// Phase of a builder run; errors carry the phase they interrupted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildPhase {
  Source,
  Configure,
  Compile,
  Collect,
}

impl fmt::Display for BuildPhase {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      BuildPhase::Source => "source acquisition",
      BuildPhase::Configure => "configure",
      BuildPhase::Compile => "compile",
      BuildPhase::Collect => "collect",
    })
  }
}

/// Errors that can occur while building a project.
#[derive(Debug, Error)]
pub enum BuildError {
  /// A shelled-out build step failed; the source carries the command string.
  #[error("{phase} failed: {source}")]
  Command {
    phase: BuildPhase,
    #[source]
    source: RunError,
  },

  /// The Rust toolchain electrs needs is not installed.
  #[error("{0}")]
  ToolchainMissing(String),

  /// The build finished but its expected output binary is missing.
  #[error("{project} build produced no usable binary (expected {})", expected.display())]
  NoBinaries { project: String, expected: PathBuf },

  /// Binary collection failed.
  #[error(transparent)]
  Collect(#[from] CollectError),

  /// Filesystem preparation failed (e.g. creating the build root).
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

impl BuildError {
  /// Wrap a command failure with the phase it interrupted.
  fn command(phase: BuildPhase) -> impl FnOnce(RunError) -> Self {
    move |source| BuildError::Command { phase, source }
  }
}

/// Strip one leading `v` to get a filesystem-safe directory suffix.
pub(crate) fn clean_version(tag: &str) -> &str {
  tag.strip_prefix('v').unwrap_or(tag)
}

/// `<build_root>/<project>-<version>`, the source tree location.
pub(crate) fn source_dir(build_root: &Path, project: &str, tag: &str) -> PathBuf {
  build_root.join(format!("{project}-{}", clean_version(tag)))
}

/// `<build_root>/binaries/<project>-<version>`, the collected outputs.
pub(crate) fn output_dir(build_root: &Path, project: &str, tag: &str) -> PathBuf {
  build_root.join("binaries").join(format!("{project}-{}", clean_version(tag)))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn clean_version_strips_one_leading_v() {
    assert_eq!(clean_version("v27.0"), "27.0");
    assert_eq!(clean_version("27.0"), "27.0");
  }

  #[test]
  fn layout_paths() {
    let root = Path::new("/b");
    assert_eq!(source_dir(root, "bitcoin", "v27.0"), Path::new("/b/bitcoin-27.0"));
    assert_eq!(output_dir(root, "electrs", "v0.10.5"), Path::new("/b/binaries/electrs-0.10.5"));
  }

  #[test]
  fn command_error_reports_phase_and_command() {
    let err = BuildError::command(BuildPhase::Compile)(RunError::CommandFailed {
      cmd: "make -j4".to_string(),
      code: Some(2),
    });
    let text = err.to_string();
    assert!(text.contains("compile failed"));
    assert!(format!("{:?}", err).contains("make -j4"));
  }
}
