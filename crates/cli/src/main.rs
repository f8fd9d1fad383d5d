//! nodeforge: clone and compile Bitcoin Core and electrs at pinned release
//! tags, collecting the binaries into a versioned output directory.

mod cmd;
mod output;
mod prompts;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use nodeforge_lib::orchestrate::BuildTarget;
use tracing_subscriber::EnvFilter;

/// Build Bitcoin Core and electrs from source at selected release tags.
#[derive(Parser)]
#[command(name = "nodeforge")]
#[command(author, version, about, long_about = None)]
struct Cli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Clone (or update) and compile the selected project(s)
  Build {
    /// What to build
    #[arg(value_enum)]
    target: TargetArg,

    /// Release tag for Bitcoin Core (e.g. v27.0)
    #[arg(long)]
    bitcoin_version: Option<String>,

    /// Release tag for electrs (e.g. v0.10.5)
    #[arg(long)]
    electrs_version: Option<String>,

    /// Parallel compile jobs (defaults to the number of CPUs)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Parent directory for sources and collected binaries
    #[arg(long)]
    build_dir: Option<PathBuf>,

    /// Check Homebrew packages and the Rust toolchain before building
    #[arg(long)]
    preflight: bool,

    /// Answer yes to every confirmation prompt
    #[arg(short = 'y', long)]
    yes: bool,
  },

  /// List the latest stable release tags
  Versions {
    /// Which project(s) to list
    #[arg(value_enum, default_value_t = TargetArg::Both)]
    target: TargetArg,

    /// Print as JSON
    #[arg(long)]
    json: bool,
  },

  /// Check Homebrew, required packages, and the Rust toolchain
  Check,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TargetArg {
  Bitcoin,
  Electrs,
  Both,
}

impl From<TargetArg> for BuildTarget {
  fn from(target: TargetArg) -> Self {
    match target {
      TargetArg::Bitcoin => BuildTarget::Bitcoin,
      TargetArg::Electrs => BuildTarget::Electrs,
      TargetArg::Both => BuildTarget::Both,
    }
  }
}

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .without_time()
    .init();

  let cli = Cli::parse();

  match cli.command {
    Commands::Build {
      target,
      bitcoin_version,
      electrs_version,
      jobs,
      build_dir,
      preflight,
      yes,
    } => cmd::cmd_build(cmd::BuildArgs {
      target: target.into(),
      bitcoin_version,
      electrs_version,
      jobs,
      build_dir,
      preflight,
      yes,
    }),
    Commands::Versions { target, json } => cmd::cmd_versions(target.into(), json),
    Commands::Check => cmd::cmd_check(),
  }
}
