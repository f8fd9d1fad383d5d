//! Bitcoin Core builder.
//!
//! Node-only scope: wallet and IPC support are always disabled. This tool
//! exists to stand up indexing infrastructure, not a wallet.
//!
//! Releases from v25 on build with CMake; older ones bootstrap autotools.
//! The two paths also leave their binaries in different places and produce
//! different artifact sets, so the collection candidates branch with the
//! build system.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::build::{BuildError, BuildPhase, output_dir, source_dir, source::ensure_source};
use crate::collect::collect_binaries;
use crate::environment::BuildEnvironment;
use crate::frontend::Frontend;
use crate::runner::run_command;
use crate::settings::Settings;
use crate::version::uses_cmake;

/// Binaries a CMake build drops in `build/bin`.
const CMAKE_BINARIES: &[&str] = &["bitcoind", "bitcoin-cli", "bitcoin-tx", "bitcoin-wallet", "bitcoin-util"];

/// Binaries an autotools build drops in `bin`.
const AUTOTOOLS_BINARIES: &[&str] = &["bitcoind", "bitcoin-cli", "bitcoin-tx", "bitcoin-wallet"];

/// Clone (or update) Bitcoin Core at `version` and compile it.
///
/// Returns the directory the collected binaries were copied to. An empty
/// collection is advisory here: release lines differ in which binaries they
/// produce, so the per-path status is logged instead of failing the build.
pub async fn build_bitcoin(
  version: &str,
  build_root: &Path,
  jobs: usize,
  env: &BuildEnvironment,
  settings: &Settings,
  frontend: &Frontend,
) -> Result<PathBuf, BuildError> {
  frontend.log(format!("=== Compiling Bitcoin Core {version} ==="));
  fs::create_dir_all(build_root)?;

  let src_dir = source_dir(build_root, "bitcoin", version);
  ensure_source(&settings.bitcoin_repo, version, &src_dir, env, frontend)
    .await
    .map_err(BuildError::command(BuildPhase::Source))?;

  frontend.log(format!("PATH: {}", env.path()));
  frontend.log("Building node-only (wallet support disabled)");

  let (binary_dir, names) = if uses_cmake(version) {
    frontend.log(format!("Configuring with CMake (Bitcoin Core {version})..."));
    run_command("cmake -B build -DENABLE_WALLET=OFF -DENABLE_IPC=OFF", Some(&src_dir), Some(env), frontend)
      .await
      .map_err(BuildError::command(BuildPhase::Configure))?;

    frontend.log(format!("Compiling with {jobs} jobs..."));
    run_command(&format!("cmake --build build -j{jobs}"), Some(&src_dir), Some(env), frontend)
      .await
      .map_err(BuildError::command(BuildPhase::Compile))?;

    (src_dir.join("build").join("bin"), CMAKE_BINARIES)
  } else {
    frontend.log(format!("Configuring with autotools (Bitcoin Core {version})..."));
    run_command("./autogen.sh", Some(&src_dir), Some(env), frontend)
      .await
      .map_err(BuildError::command(BuildPhase::Configure))?;
    run_command("./configure --disable-wallet --disable-gui", Some(&src_dir), Some(env), frontend)
      .await
      .map_err(BuildError::command(BuildPhase::Configure))?;

    frontend.log(format!("Compiling with {jobs} jobs..."));
    run_command(&format!("make -j{jobs}"), Some(&src_dir), Some(env), frontend)
      .await
      .map_err(BuildError::command(BuildPhase::Compile))?;

    (src_dir.join("bin"), AUTOTOOLS_BINARIES)
  };

  let candidates: Vec<PathBuf> = names.iter().map(|name| binary_dir.join(name)).collect();
  let out_dir = output_dir(build_root, "bitcoin", version);
  let copied = collect_binaries(&out_dir, &candidates, frontend)?;

  if copied.is_empty() {
    frontend.log("warning: no binaries were copied; per-path status:");
    for candidate in &candidates {
      let status = if candidate.exists() { "ok" } else { "missing" };
      frontend.log(format!("  {status} {}", candidate.display()));
    }
  }

  frontend.log(format!(
    "Bitcoin Core {version} build complete, {} binaries in {}",
    copied.len(),
    out_dir.display()
  ));
  info!(version, copied = copied.len(), "bitcoin build finished");
  Ok(out_dir)
}
