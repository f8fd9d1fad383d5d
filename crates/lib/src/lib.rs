//! nodeforge-lib: build orchestration for Bitcoin Core and electrs
//!
//! This crate owns everything between "the user picked a release tag" and
//! "compiled binaries landed in the output directory":
//! - `environment`: per-invocation build environment resolution
//! - `runner`: shell command execution with live line streaming
//! - `version`: release-tag policy and stable-release discovery
//! - `collect`: copying build outputs into a versioned destination
//! - `build`: the two project builders (Bitcoin Core, electrs)
//! - `orchestrate`: sequential multi-project builds with validation
//! - `frontend`: the event channel a UI (or the CLI) drains
//!
//! The actual compilation is delegated to `git`, `cmake`/`make`, and `cargo`.

pub mod build;
pub mod collect;
pub mod consts;
pub mod deps;
pub mod environment;
pub mod frontend;
pub mod orchestrate;
pub mod platform;
pub mod runner;
pub mod settings;
pub mod version;

#[cfg(test)]
pub(crate) mod testutil;
