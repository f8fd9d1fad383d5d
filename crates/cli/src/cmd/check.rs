//! Implementation of the `nodeforge check` command.
//!
//! Runs the dependency probe and prints the report; the exit code reflects
//! readiness so scripts can gate on it.

use anyhow::{Context, Result};

use nodeforge_lib::deps::check_dependencies;
use nodeforge_lib::environment::resolve_environment;
use nodeforge_lib::frontend::{Frontend, FrontendEvent};
use nodeforge_lib::settings::Settings;

use crate::output::{print_success, print_warning};

pub fn cmd_check() -> Result<()> {
  let settings = Settings::load().context("Failed to load settings")?;
  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;

  let report = rt.block_on(async {
    let (frontend, mut events) = Frontend::channel();

    let worker = tokio::spawn(async move {
      let env = resolve_environment();
      check_dependencies(&settings, &env, &frontend).await
    });

    while let Some(event) = events.recv().await {
      if let FrontendEvent::Log(line) = event {
        println!("{line}");
      }
    }
    worker.await.context("dependency check panicked")
  })?;

  println!();
  if report.is_ready() {
    print_success("All dependencies are installed and ready.");
    Ok(())
  } else {
    if !report.brew_found {
      print_warning("Homebrew is missing (https://brew.sh).");
    }
    if !report.missing_packages.is_empty() {
      print_warning(&format!("Missing Homebrew packages: {}", report.missing_packages.join(", ")));
    }
    if !report.rust_ok {
      print_warning("Rust toolchain is missing or incomplete (https://rustup.rs).");
    }
    std::process::exit(1);
  }
}
