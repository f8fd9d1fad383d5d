//! Test helpers: fake toolchain binaries on an isolated PATH.
//!
//! Builder tests must not depend on git, cmake, or cargo existing on the
//! host. `FakeTools` drops shell-script stand-ins into a temp bin directory
//! and hands out a [`BuildEnvironment`] whose PATH contains only that
//! directory; every invocation is appended to a log file for assertions.

use std::path::{Path, PathBuf};

use crate::environment::{BuildEnvironment, ToolPaths, resolve_with};

pub(crate) struct FakeTools {
  bin_dir: PathBuf,
  log: PathBuf,
}

impl FakeTools {
  /// Fake tools that log their invocation and exit 0.
  pub(crate) fn new(root: &Path, tools: &[&str]) -> Self {
    Self::with_exit_code(root, tools, 0)
  }

  /// Fake tools that log their invocation and exit 1.
  pub(crate) fn failing(root: &Path, tools: &[&str]) -> Self {
    Self::with_exit_code(root, tools, 1)
  }

  fn with_exit_code(root: &Path, tools: &[&str], code: i32) -> Self {
    let bin_dir = root.join("fake-bin");
    std::fs::create_dir_all(&bin_dir).unwrap();
    let log = root.join("fake-tools.log");

    for tool in tools {
      let script = format!(
        "#!/bin/sh\necho \"{tool} $*\" >> \"$FAKE_TOOL_LOG\"\necho \"{tool} fake 1.0.0\"\nexit {code}\n"
      );
      let path = bin_dir.join(tool);
      std::fs::write(&path, script).unwrap();
      make_executable(&path);
    }

    Self { bin_dir, log }
  }

  /// Build environment whose PATH holds only the fake bin directory.
  pub(crate) fn env(&self) -> BuildEnvironment {
    resolve_with(
      &ToolPaths::default(),
      vec![
        ("PATH".to_string(), self.bin_dir.display().to_string()),
        ("FAKE_TOOL_LOG".to_string(), self.log.display().to_string()),
      ],
    )
  }
}

/// Every fake-tool invocation so far, one `"<tool> <args>"` line each.
pub(crate) fn commands_run(fake: &FakeTools) -> Vec<String> {
  match std::fs::read_to_string(&fake.log) {
    Ok(text) => text.lines().map(str::to_string).collect(),
    Err(_) => Vec::new(),
  }
}

#[cfg(unix)]
fn make_executable(path: &Path) {
  use std::os::unix::fs::PermissionsExt;
  std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) {}
