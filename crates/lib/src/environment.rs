//! Build environment resolution.
//!
//! Probes the host for tool locations at call time and assembles the
//! environment map every build subprocess runs with. The real process
//! environment is never mutated; callers get an independent snapshot.
//!
//! PATH priority, earliest wins on lookup:
//! 1. Homebrew bin directory (if detected)
//! 2. `~/.cargo/bin` (if it exists)
//! 3. `<brew prefix>/opt/llvm/bin` (if it exists)
//! 4. the inherited PATH, unchanged, as a single trailing component
//!
//! When the LLVM keg is found, `LIBCLANG_PATH` and `DYLD_LIBRARY_PATH` are
//! additionally pointed at its `lib` directory: electrs pulls in
//! rust-bindgen, which must locate libclang's shared libraries at build time,
//! and PATH alone cannot provide that.

use std::collections::BTreeMap;
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::platform::brew::Brew;
use crate::platform::paths;

/// Environment variable map handed to a build subprocess.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildEnvironment {
  vars: BTreeMap<String, String>,
}

impl BuildEnvironment {
  pub fn get(&self, name: &str) -> Option<&str> {
    self.vars.get(name).map(String::as_str)
  }

  /// The assembled PATH value (empty string if unset).
  pub fn path(&self) -> &str {
    self.get("PATH").unwrap_or("")
  }

  /// Replace a command's environment with this map.
  pub fn apply_to(&self, command: &mut tokio::process::Command) {
    command.env_clear();
    for (name, value) in &self.vars {
      command.env(name, value);
    }
  }
}

/// Locations of the optional toolchains feeding the PATH assembly.
///
/// Separated from the resolver so tests can hand in any present/absent
/// combination without touching the host.
#[derive(Debug, Clone, Default)]
pub struct ToolPaths {
  /// Homebrew bin directory, when brew was detected.
  pub brew_bin: Option<PathBuf>,

  /// `~/.cargo/bin`, when it exists.
  pub cargo_bin: Option<PathBuf>,

  /// `<brew prefix>/opt/llvm`, when it exists.
  pub llvm_prefix: Option<PathBuf>,
}

impl ToolPaths {
  /// Probe the host filesystem for the fixed candidate locations.
  pub fn probe() -> Self {
    let brew = Brew::detect();
    if brew.is_none() {
      warn!("Homebrew prefix not detected, PATH gets no brew entry");
    }

    let cargo_bin = Some(paths::cargo_bin_dir()).filter(|p| p.is_dir());
    let llvm_prefix = brew.as_ref().map(Brew::llvm_prefix).filter(|p| p.is_dir());

    Self {
      brew_bin: brew.map(|b| b.bin_dir()),
      cargo_bin,
      llvm_prefix,
    }
  }
}

/// Resolve the build environment from the host's current state.
pub fn resolve_environment() -> BuildEnvironment {
  resolve_with(&ToolPaths::probe(), std::env::vars())
}

/// Assemble the environment from probed tool paths and a base environment
/// snapshot. Pure; see module docs for the PATH rules.
pub fn resolve_with(tools: &ToolPaths, base: impl IntoIterator<Item = (String, String)>) -> BuildEnvironment {
  let mut vars: BTreeMap<String, String> = base.into_iter().collect();

  let mut components: Vec<String> = Vec::new();
  if let Some(dir) = &tools.brew_bin {
    components.push(dir.display().to_string());
  }
  if let Some(dir) = &tools.cargo_bin {
    components.push(dir.display().to_string());
  }
  if let Some(prefix) = &tools.llvm_prefix {
    components.push(prefix.join("bin").display().to_string());
  }
  // Inherited PATH last, as one opaque component.
  if let Some(inherited) = vars.get("PATH").filter(|p| !p.is_empty()) {
    components.push(inherited.clone());
  }

  let path = dedup_preserving_order(components).join(":");
  debug!(path = %path, "resolved build PATH");
  vars.insert("PATH".to_string(), path);

  if let Some(prefix) = &tools.llvm_prefix {
    let lib = prefix.join("lib").display().to_string();
    vars.insert("LIBCLANG_PATH".to_string(), lib.clone());
    vars.insert("DYLD_LIBRARY_PATH".to_string(), lib);
  }

  BuildEnvironment { vars }
}

/// De-duplicate, keeping the first occurrence of each entry.
fn dedup_preserving_order(components: Vec<String>) -> Vec<String> {
  let mut seen = std::collections::BTreeSet::new();
  components.into_iter().filter(|c| !c.is_empty() && seen.insert(c.clone())).collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn base(path: &str) -> Vec<(String, String)> {
    vec![("PATH".to_string(), path.to_string()), ("HOME".to_string(), "/home/u".to_string())]
  }

  fn tools(brew: Option<&str>, cargo: Option<&str>, llvm: Option<&str>) -> ToolPaths {
    ToolPaths {
      brew_bin: brew.map(PathBuf::from),
      cargo_bin: cargo.map(PathBuf::from),
      llvm_prefix: llvm.map(PathBuf::from),
    }
  }

  #[test]
  fn all_tools_present_in_priority_order() {
    let env = resolve_with(
      &tools(Some("/hb/bin"), Some("/home/u/.cargo/bin"), Some("/hb/opt/llvm")),
      base("/usr/bin:/bin"),
    );
    assert_eq!(env.path(), "/hb/bin:/home/u/.cargo/bin:/hb/opt/llvm/bin:/usr/bin:/bin");
  }

  #[test]
  fn absent_tools_contribute_nothing() {
    for (brew, cargo, llvm) in [
      (None, None, None),
      (Some("/hb/bin"), None, None),
      (None, Some("/c/bin"), None),
      (None, None, Some("/hb/opt/llvm")),
      (Some("/hb/bin"), None, Some("/hb/opt/llvm")),
    ] {
      let env = resolve_with(&tools(brew, cargo, llvm), base("/usr/bin"));
      let entries: Vec<&str> = env.path().split(':').collect();
      let expected = [brew.map(|_| "/hb/bin"), cargo.map(|_| "/c/bin"), llvm.map(|_| "/hb/opt/llvm/bin")]
        .into_iter()
        .flatten()
        .chain(["/usr/bin"])
        .collect::<Vec<_>>();
      assert_eq!(entries, expected, "brew={brew:?} cargo={cargo:?} llvm={llvm:?}");
    }
  }

  #[test]
  fn entries_are_deduplicated_first_seen_wins() {
    // Inherited PATH identical to the brew component collapses into it.
    let env = resolve_with(&tools(Some("/hb/bin"), Some("/hb/bin"), None), base("/hb/bin"));
    assert_eq!(env.path(), "/hb/bin");
  }

  #[test]
  fn empty_inherited_path_is_dropped() {
    let env = resolve_with(&tools(Some("/hb/bin"), None, None), base(""));
    assert_eq!(env.path(), "/hb/bin");
  }

  #[test]
  fn library_hints_set_only_with_llvm() {
    let with = resolve_with(&tools(None, None, Some("/hb/opt/llvm")), base("/bin"));
    assert_eq!(with.get("LIBCLANG_PATH"), Some("/hb/opt/llvm/lib"));
    assert_eq!(with.get("DYLD_LIBRARY_PATH"), Some("/hb/opt/llvm/lib"));

    let without = resolve_with(&tools(Some("/hb/bin"), None, None), base("/bin"));
    assert_eq!(without.get("LIBCLANG_PATH"), None);
    assert_eq!(without.get("DYLD_LIBRARY_PATH"), None);
  }

  #[test]
  fn unrelated_base_vars_survive() {
    let env = resolve_with(&ToolPaths::default(), base("/bin"));
    assert_eq!(env.get("HOME"), Some("/home/u"));
  }

  #[test]
  fn resolve_environment_does_not_mutate_process_env() {
    let before = std::env::var("PATH").ok();
    let _ = resolve_environment();
    assert_eq!(std::env::var("PATH").ok(), before);
  }
}
