//! Dependency preflight: Homebrew packages and the Rust toolchain.
//!
//! Probes only, nothing is installed here. The report says what is missing;
//! the orchestrator (or the user) decides what to do about it.

use tracing::info;

use crate::environment::BuildEnvironment;
use crate::frontend::Frontend;
use crate::platform::Brew;
use crate::runner::{command_succeeds, probe_tool};
use crate::settings::Settings;

/// Outcome of a dependency check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepsReport {
  /// Whether Homebrew itself was found.
  pub brew_found: bool,

  /// Configured packages `brew list` does not know about. When Homebrew is
  /// absent this is the whole configured list.
  pub missing_packages: Vec<String>,

  /// Whether both `cargo` and `rustc` answered a version probe.
  pub rust_ok: bool,
}

impl DepsReport {
  /// Everything a build needs is present.
  pub fn is_ready(&self) -> bool {
    self.brew_found && self.missing_packages.is_empty() && self.rust_ok
  }
}

/// Probe Homebrew, the configured packages, and the Rust toolchain.
///
/// Logs per-item status as it goes. Missing Homebrew is reported, not fatal:
/// the caller may still be able to build with tools from elsewhere.
pub async fn check_dependencies(settings: &Settings, env: &BuildEnvironment, frontend: &Frontend) -> DepsReport {
  check_with(Brew::detect().as_ref(), settings, env, frontend).await
}

/// Inner check over an already-detected Homebrew installation (or none).
pub(crate) async fn check_with(
  brew: Option<&Brew>,
  settings: &Settings,
  env: &BuildEnvironment,
  frontend: &Frontend,
) -> DepsReport {
  frontend.log("=== Checking system dependencies ===");

  let Some(brew) = brew else {
    frontend.log("Homebrew not found! Install it from https://brew.sh");
    let rust_ok = rust_status(env, frontend).await;
    return DepsReport {
      brew_found: false,
      missing_packages: settings.brew_packages.clone(),
      rust_ok,
    };
  };

  frontend.log(format!("Homebrew found at: {}", brew.executable().display()));
  frontend.log("Checking Homebrew packages...");

  let mut missing = Vec::new();
  for pkg in &settings.brew_packages {
    let ok = command_succeeds(&format!("{} list {pkg}", brew.executable().display()), Some(env)).await;
    frontend.log(format!("  {} {pkg}", if ok { "ok" } else { "missing" }));
    if !ok {
      missing.push(pkg.clone());
    }
  }
  if missing.is_empty() {
    frontend.log("All Homebrew packages are installed");
  } else {
    frontend.log(format!("Missing Homebrew packages: {}", missing.join(", ")));
  }

  let rust_ok = rust_status(env, frontend).await;
  info!(missing = missing.len(), rust_ok, "dependency check finished");

  DepsReport {
    brew_found: true,
    missing_packages: missing,
    rust_ok,
  }
}

async fn rust_status(env: &BuildEnvironment, frontend: &Frontend) -> bool {
  frontend.log("Checking Rust toolchain...");
  let cargo = probe_tool("cargo", env).await;
  let rustc = probe_tool("rustc", env).await;

  match &cargo {
    Some(version) => frontend.log(format!("cargo found: {version}")),
    None => frontend.log("cargo not found"),
  }
  match &rustc {
    Some(version) => frontend.log(format!("rustc found: {version}")),
    None => frontend.log("rustc not found"),
  }

  cargo.is_some() && rustc.is_some()
}
