//! Binary collection: copy build outputs into a versioned destination.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::frontend::Frontend;

/// Errors that can occur while collecting binaries.
#[derive(Debug, Error)]
pub enum CollectError {
  /// The destination directory could not be created.
  #[error("failed to create output directory '{0}': {1}")]
  CreateDir(PathBuf, #[source] std::io::Error),

  /// An existing candidate could not be copied or made executable.
  #[error("failed to copy '{src}' to '{dest}': {source}")]
  Copy {
    src: PathBuf,
    dest: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

/// Copy each existing candidate into `dest_dir`, making it executable (0o755).
///
/// Candidates are processed in input order; a missing one is skipped with a
/// log line, never an error: artifact sets differ across release lines, and
/// one optional utility binary must not fail a whole build. Whether an empty
/// result is fatal is the caller's decision. Returns destination paths in
/// copy order.
pub fn collect_binaries(
  dest_dir: &Path,
  candidates: &[PathBuf],
  frontend: &Frontend,
) -> Result<Vec<PathBuf>, CollectError> {
  fs::create_dir_all(dest_dir).map_err(|e| CollectError::CreateDir(dest_dir.to_path_buf(), e))?;

  frontend.log(format!("Copying binaries to: {}", dest_dir.display()));
  let mut copied = Vec::new();

  for src in candidates {
    let Some(name) = src.file_name() else {
      frontend.log(format!("skipping candidate without a file name: {}", src.display()));
      continue;
    };
    if !src.exists() {
      frontend.log(format!("binary not found (skipping): {}", src.display()));
      continue;
    }

    let dest = dest_dir.join(name);
    let copy_err = |source| CollectError::Copy { src: src.clone(), dest: dest.clone(), source };
    fs::copy(src, &dest).map_err(copy_err)?;
    set_executable(&dest).map_err(copy_err)?;
    debug!(src = %src.display(), dest = %dest.display(), "binary copied");
    frontend.log(format!("copied {} -> {}", name.to_string_lossy(), dest.display()));
    copied.push(dest);
  }

  if copied.is_empty() {
    frontend.log("warning: no binaries were copied");
  }
  Ok(copied)
}

#[cfg(unix)]
fn set_executable(path: &Path) -> std::io::Result<()> {
  use std::os::unix::fs::PermissionsExt;
  fs::set_permissions(path, fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> std::io::Result<()> {
  Ok(())
}
