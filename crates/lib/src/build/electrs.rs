//! electrs builder.
//!
//! A single cargo release build, gated on a toolchain probe first.
//! A missing Rust toolchain is the single most common setup gap, and it
//! deserves one actionable error instead of a deep stack of cargo noise.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::build::{BuildError, BuildPhase, output_dir, source_dir, source::ensure_source};
use crate::collect::collect_binaries;
use crate::environment::BuildEnvironment;
use crate::frontend::Frontend;
use crate::runner::{probe_tool, run_command};
use crate::settings::Settings;

/// The one binary a release build produces.
const ELECTRS_BINARY: &str = "electrs";

/// Clone (or update) electrs at `version` and build it with cargo.
///
/// Returns the directory the binary was copied to. electrs is a
/// single-artifact project: a missing `target/release/electrs` after a
/// green build means the build produced nothing usable, which is fatal.
pub async fn build_electrs(
  version: &str,
  build_root: &Path,
  jobs: usize,
  env: &BuildEnvironment,
  settings: &Settings,
  frontend: &Frontend,
) -> Result<PathBuf, BuildError> {
  frontend.log(format!("=== Compiling electrs {version} ==="));

  frontend.log("Verifying Rust toolchain...");
  let Some(cargo_version) = probe_tool("cargo", env).await else {
    return Err(BuildError::ToolchainMissing(format!(
      "cargo not found; electrs needs the Rust toolchain. \
       Install rust (Homebrew or rustup) and retry. PATH: {}",
      env.path()
    )));
  };
  frontend.log(format!("cargo found: {cargo_version}"));

  match probe_tool("rustc", env).await {
    Some(rustc_version) => frontend.log(format!("rustc found: {rustc_version}")),
    None => frontend.log("warning: rustc probe failed, but cargo is present; proceeding"),
  }

  fs::create_dir_all(build_root)?;
  let src_dir = source_dir(build_root, "electrs", version);
  ensure_source(&settings.electrs_repo, version, &src_dir, env, frontend)
    .await
    .map_err(BuildError::command(BuildPhase::Source))?;

  frontend.log(format!("Building with cargo ({jobs} jobs)..."));
  frontend.log(format!("PATH: {}", env.path()));
  if let Some(libclang) = env.get("LIBCLANG_PATH") {
    frontend.log(format!("LIBCLANG_PATH: {libclang}"));
  }

  run_command(&format!("cargo build --release --jobs {jobs}"), Some(&src_dir), Some(env), frontend)
    .await
    .map_err(BuildError::command(BuildPhase::Compile))?;

  let binary = src_dir.join("target").join("release").join(ELECTRS_BINARY);
  if !binary.exists() {
    return Err(BuildError::NoBinaries {
      project: "electrs".to_string(),
      expected: binary,
    });
  }

  let out_dir = output_dir(build_root, "electrs", version);
  collect_binaries(&out_dir, std::slice::from_ref(&binary), frontend)?;

  frontend.log(format!("electrs {version} build complete, binary in {}", out_dir.display()));
  info!(version, "electrs build finished");
  Ok(out_dir)
}
