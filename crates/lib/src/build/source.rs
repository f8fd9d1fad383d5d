//! Idempotent source acquisition: shallow clone or shallow tag update.

use std::path::Path;

use tracing::info;

use crate::environment::BuildEnvironment;
use crate::frontend::Frontend;
use crate::runner::{RunError, run_command};

/// Make `src_dir` hold `repo_url` checked out at `tag`.
///
/// A missing directory is shallow-cloned at the tag; an existing one gets a
/// shallow fetch of just that tag plus a hard checkout. Never a re-clone,
/// never a full-history fetch; acquisition stays fast and bounded no matter
/// how large the upstream repository is. The directory is never deleted.
pub async fn ensure_source(
  repo_url: &str,
  tag: &str,
  src_dir: &Path,
  env: &BuildEnvironment,
  frontend: &Frontend,
) -> Result<(), RunError> {
  if !src_dir.exists() {
    frontend.log(format!("Cloning {repo_url} at {tag}..."));
    run_command(
      &format!("git clone --depth 1 --branch {tag} {repo_url} {}", src_dir.display()),
      src_dir.parent(),
      Some(env),
      frontend,
    )
    .await?;
    info!(tag, dir = %src_dir.display(), "source cloned");
  } else {
    frontend.log(format!("Source directory already exists: {}", src_dir.display()));
    frontend.log(format!("Updating to {tag}..."));
    run_command(&format!("git fetch --depth 1 origin tag {tag}"), Some(src_dir), Some(env), frontend).await?;
    run_command(&format!("git checkout {tag}"), Some(src_dir), Some(env), frontend).await?;
    info!(tag, dir = %src_dir.display(), "source updated");
  }
  Ok(())
}
