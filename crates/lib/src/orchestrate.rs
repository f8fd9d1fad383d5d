//! Sequential build orchestration.
//!
//! One compile invocation validates its request, resolves the environment
//! once, and runs the selected builders strictly in sequence, Bitcoin Core
//! before electrs. Sequential is deliberate: concurrent builds would
//! interleave the live log unreadably and fight over the job count the user
//! chose. The first failure aborts the remainder; outputs of builders that
//! already finished stay valid and are never rolled back.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;
use tracing::{error, info};

use crate::build::BuildError;
use crate::build::bitcoin::build_bitcoin;
use crate::build::electrs::build_electrs;
use crate::consts::LOADING_SENTINEL;
use crate::deps::{DepsReport, check_dependencies};
use crate::environment::{BuildEnvironment, resolve_environment};
use crate::frontend::{Frontend, Severity};
use crate::settings::Settings;

/// Which project(s) a build request covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildTarget {
  Bitcoin,
  Electrs,
  Both,
}

impl BuildTarget {
  pub fn includes_bitcoin(self) -> bool {
    matches!(self, BuildTarget::Bitcoin | BuildTarget::Both)
  }

  pub fn includes_electrs(self) -> bool {
    matches!(self, BuildTarget::Electrs | BuildTarget::Both)
  }
}

/// Parameters of one compile invocation.
#[derive(Debug, Clone)]
pub struct BuildRequest {
  pub target: BuildTarget,

  /// Release tag for Bitcoin Core; required when the target includes it.
  pub bitcoin_version: Option<String>,

  /// Release tag for electrs; required when the target includes it.
  pub electrs_version: Option<String>,

  /// Parallel compile jobs.
  pub jobs: usize,

  /// Parent directory for source trees and collected binaries.
  pub build_root: PathBuf,

  /// Run the dependency check (and its confirm gate) before building.
  pub preflight: bool,
}

/// Errors surfaced by [`Orchestrator::compile`].
#[derive(Debug, Error)]
pub enum OrchestrateError {
  /// Another compile is already in flight.
  #[error("a build is already running")]
  BusyCompiling,

  /// A selected project's tag is empty or still the loading sentinel.
  /// Version lists populate asynchronously; building must wait for them.
  #[error("{project} version not selected; wait for versions to load or pass one explicitly")]
  VersionNotLoaded { project: &'static str },

  /// The user declined to continue past missing dependencies.
  #[error("build cancelled; missing Homebrew packages: {0}")]
  PreflightDeclined(String),

  /// A builder failed. Outputs of builders that already completed are valid.
  #[error("{project} build failed: {source}")]
  Build {
    project: &'static str,
    #[source]
    source: BuildError,
  },
}

/// Runs build requests, one at a time.
pub struct Orchestrator {
  settings: Settings,
  frontend: Frontend,
  busy: AtomicBool,
}

impl Orchestrator {
  pub fn new(settings: Settings, frontend: Frontend) -> Self {
    Self {
      settings,
      frontend,
      busy: AtomicBool::new(false),
    }
  }

  pub fn settings(&self) -> &Settings {
    &self.settings
  }

  /// Validate the request and run the selected builders sequentially.
  ///
  /// Returns the output directory of each completed project, in build order.
  /// Every failure is both appended to the live log and surfaced as an error
  /// notification before it is returned.
  pub async fn compile(&self, request: &BuildRequest) -> Result<Vec<PathBuf>, OrchestrateError> {
    let env = resolve_environment();
    self.compile_with_env(request, &env).await
  }

  /// Like [`Orchestrator::compile`] with an already-resolved environment,
  /// for callers that resolve once and reuse.
  pub async fn compile_with_env(
    &self,
    request: &BuildRequest,
    env: &BuildEnvironment,
  ) -> Result<Vec<PathBuf>, OrchestrateError> {
    // The guard plays the role of the disabled compile trigger: held for the
    // whole run, released on every exit path.
    let Some(_guard) = BusyGuard::acquire(&self.busy) else {
      return Err(OrchestrateError::BusyCompiling);
    };

    let result = self.run(request, env).await;
    match &result {
      Ok(output_dirs) => {
        let mut message = String::from("Compilation completed successfully. Binaries saved to:");
        for dir in output_dirs {
          message.push_str(&format!("\n  {}", dir.display()));
        }
        self.frontend.notify(Severity::Info, "Compilation complete", &message);
        info!(outputs = output_dirs.len(), "compile finished");
      }
      Err(err) => {
        self.frontend.log(format!("Compilation failed: {err}"));
        self.frontend.notify(Severity::Error, "Compilation failed", &err.to_string());
        error!(error = %err, "compile failed");
      }
    }
    result
  }

  async fn run(&self, request: &BuildRequest, env: &BuildEnvironment) -> Result<Vec<PathBuf>, OrchestrateError> {
    self.frontend.progress(0.0);

    // Both tags are validated up front: no subprocess runs (for either
    // project) until the whole request is well-formed.
    let bitcoin_version = request
      .target
      .includes_bitcoin()
      .then(|| required_version(request.bitcoin_version.as_deref(), "Bitcoin Core"))
      .transpose()?;
    let electrs_version = request
      .target
      .includes_electrs()
      .then(|| required_version(request.electrs_version.as_deref(), "electrs"))
      .transpose()?;

    if request.preflight {
      self.preflight(env).await?;
    }

    let both = bitcoin_version.is_some() && electrs_version.is_some();
    let mut output_dirs = Vec::new();

    if let Some(version) = bitcoin_version {
      self.frontend.progress(10.0);
      let dir = build_bitcoin(version, &request.build_root, request.jobs, env, &self.settings, &self.frontend)
        .await
        .map_err(|source| OrchestrateError::Build { project: "Bitcoin Core", source })?;
      output_dirs.push(dir);
      self.frontend.progress(50.0);
    }

    if let Some(version) = electrs_version {
      self.frontend.progress(if both { 60.0 } else { 10.0 });
      let dir = build_electrs(version, &request.build_root, request.jobs, env, &self.settings, &self.frontend)
        .await
        .map_err(|source| OrchestrateError::Build { project: "electrs", source })?;
      output_dirs.push(dir);
    }

    self.frontend.progress(100.0);
    Ok(output_dirs)
  }

  /// Dependency check before building; missing packages put the decision to
  /// the user through the blocking confirm channel.
  async fn preflight(&self, env: &BuildEnvironment) -> Result<(), OrchestrateError> {
    let report = check_dependencies(&self.settings, env, &self.frontend).await;
    preflight_gate(&report, &self.frontend).await
  }
}

/// Gate a build on a dependency report: missing packages ask the user whether
/// to continue anyway; declining cancels the build.
pub(crate) async fn preflight_gate(report: &DepsReport, frontend: &Frontend) -> Result<(), OrchestrateError> {
  if report.missing_packages.is_empty() {
    return Ok(());
  }

  let list = report.missing_packages.join(", ");
  let proceed = frontend
    .confirm(
      "Missing dependencies",
      &format!(
        "{} required package(s) are not installed: {list}. Continue with the build anyway?",
        report.missing_packages.len()
      ),
    )
    .await;

  if proceed { Ok(()) } else { Err(OrchestrateError::PreflightDeclined(list)) }
}

fn required_version<'a>(tag: Option<&'a str>, project: &'static str) -> Result<&'a str, OrchestrateError> {
  match tag {
    Some(tag) if !tag.is_empty() && tag != LOADING_SENTINEL => Ok(tag),
    _ => Err(OrchestrateError::VersionNotLoaded { project }),
  }
}

/// RAII single-flight flag: acquired with a compare-exchange, released on drop.
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
  fn acquire(flag: &'a AtomicBool) -> Option<Self> {
    flag
      .compare_exchange(false, true, Ordering::Acquire, Ordering::Acquire)
      .is_ok()
      .then(|| Self(flag))
  }
}

impl Drop for BusyGuard<'_> {
  fn drop(&mut self) {
    self.0.store(false, Ordering::Release);
  }
}
