//! Implementation of the `nodeforge build` command.
//!
//! The compile runs as a background task; this command's job is to drain the
//! frontend event channel and render it: log lines verbatim, progress as a
//! dim gauge, notifications as colored status lines, confirmations through a
//! stdin prompt. That event loop is the CLI stand-in for a GUI main thread.

use std::path::PathBuf;
use std::thread::available_parallelism;

use anyhow::{Context, Result};
use tracing::debug;

use nodeforge_lib::frontend::{Frontend, FrontendEvent, Severity};
use nodeforge_lib::orchestrate::{BuildRequest, BuildTarget, Orchestrator};
use nodeforge_lib::settings::Settings;

use crate::output::{print_error, print_info, print_progress, print_success, print_warning};
use crate::prompts;

pub struct BuildArgs {
  pub target: BuildTarget,
  pub bitcoin_version: Option<String>,
  pub electrs_version: Option<String>,
  pub jobs: Option<usize>,
  pub build_dir: Option<PathBuf>,
  pub preflight: bool,
  pub yes: bool,
}

pub fn cmd_build(args: BuildArgs) -> Result<()> {
  let settings = Settings::load().context("Failed to load settings")?;

  let request = BuildRequest {
    target: args.target,
    bitcoin_version: args.bitcoin_version,
    electrs_version: args.electrs_version,
    jobs: args.jobs.unwrap_or_else(default_jobs),
    build_root: args.build_dir.unwrap_or_else(|| settings.build_root.clone()),
    preflight: args.preflight,
  };
  debug!(jobs = request.jobs, build_root = %request.build_root.display(), "build request assembled");

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  rt.block_on(async {
    let (frontend, mut events) = Frontend::channel();

    // The orchestrator (and with it the last Frontend handle) lives inside
    // the worker task; when the compile finishes the channel closes and the
    // drain loop below ends.
    let worker = tokio::spawn(async move { Orchestrator::new(settings, frontend).compile(&request).await });

    // Drain until every Frontend handle is gone (the worker finished).
    while let Some(event) = events.recv().await {
      handle_event(event, args.yes);
    }

    let result = worker.await.context("build task panicked")?;
    match result {
      Ok(output_dirs) => {
        println!();
        for dir in &output_dirs {
          print_info(&format!("binaries: {}", dir.display()));
        }
        Ok(())
      }
      // Already rendered through the notification event; just fail the exit code.
      Err(_) => std::process::exit(1),
    }
  })
}

fn handle_event(event: FrontendEvent, assume_yes: bool) {
  match event {
    FrontendEvent::Log(line) => println!("{line}"),
    FrontendEvent::Progress(percent) => print_progress(percent),
    FrontendEvent::Notify { severity, title, message } => {
      let text = format!("{title}: {message}");
      match severity {
        Severity::Info => print_success(&text),
        Severity::Warning => print_warning(&text),
        Severity::Error => print_error(&text),
      }
    }
    FrontendEvent::Confirm { title, message, reply } => {
      let answer = prompts::confirm(&format!("{title}: {message}"), assume_yes).unwrap_or_else(|err| {
        print_error(&err.to_string());
        false
      });
      let _ = reply.send(answer);
    }
  }
}

fn default_jobs() -> usize {
  available_parallelism().map(usize::from).unwrap_or(4)
}
