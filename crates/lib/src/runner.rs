//! Shell command execution with live line streaming.
//!
//! Commands are pre-formatted strings launched through `/bin/sh -c`, so the
//! caller's quoting and globbing survive intact. Output is read line by line
//! and forwarded to the frontend the moment each line is produced, so a watcher
//! sees build progress live, never in one burst at the end. stdout and stderr
//! are separate pipes drained concurrently; within each stream, every line is
//! forwarded before the next read.

use std::path::Path;
use std::process::Stdio;

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::debug;

use crate::environment::BuildEnvironment;
use crate::frontend::Frontend;

/// Errors that can occur while running a shell command.
#[derive(Debug, Error)]
pub enum RunError {
  /// The command ran and exited non-zero.
  #[error("command failed with exit code {code:?}: {cmd}")]
  CommandFailed { cmd: String, code: Option<i32> },

  /// The command could not be spawned or its output could not be read.
  #[error("failed to run '{cmd}': {source}")]
  Io {
    cmd: String,
    #[source]
    source: std::io::Error,
  },
}

/// Run a shell command, streaming its output to the frontend log.
///
/// All output produced before a failure is forwarded before the error is
/// returned; the error carries the original command string. Never retries.
pub async fn run_command(
  cmd: &str,
  cwd: Option<&Path>,
  env: Option<&BuildEnvironment>,
  frontend: &Frontend,
) -> Result<(), RunError> {
  frontend.log(format!("$ {cmd}"));
  debug!(cmd = %cmd, cwd = ?cwd, "spawning shell command");

  let mut command = shell_command(cmd);
  command.stdin(Stdio::null()).stdout(Stdio::piped()).stderr(Stdio::piped());
  if let Some(dir) = cwd {
    command.current_dir(dir);
  }
  if let Some(env) = env {
    env.apply_to(&mut command);
  }

  let io_err = |source| RunError::Io { cmd: cmd.to_string(), source };

  let mut child = command.spawn().map_err(io_err)?;

  let stderr_task = child.stderr.take().map(|stderr| {
    let frontend = frontend.clone();
    tokio::spawn(async move { forward_lines(stderr, &frontend).await })
  });

  if let Some(stdout) = child.stdout.take() {
    forward_lines(stdout, frontend).await.map_err(io_err)?;
  }
  if let Some(task) = stderr_task {
    match task.await {
      Ok(Err(e)) => debug!(cmd = %cmd, error = %e, "stderr stream ended with error"),
      Err(e) => debug!(cmd = %cmd, error = %e, "stderr forwarder panicked"),
      Ok(Ok(())) => {}
    }
  }

  let status = child.wait().await.map_err(io_err)?;
  if !status.success() {
    return Err(RunError::CommandFailed {
      cmd: cmd.to_string(),
      code: status.code(),
    });
  }
  Ok(())
}

/// Run a command through the shell, discarding its output; true on exit 0.
pub async fn command_succeeds(cmd: &str, env: Option<&BuildEnvironment>) -> bool {
  let mut command = shell_command(cmd);
  command.stdin(Stdio::null()).stdout(Stdio::null()).stderr(Stdio::null());
  if let Some(env) = env {
    env.apply_to(&mut command);
  }
  matches!(command.status().await, Ok(status) if status.success())
}

/// Probe a toolchain binary by running `<tool> --version` through the shell.
///
/// Returns the first stdout line on a zero exit, `None` otherwise. Absence
/// and breakage look the same to the caller, which is the point of a probe.
pub async fn probe_tool(tool: &str, env: &BuildEnvironment) -> Option<String> {
  let mut command = shell_command(&format!("{tool} --version"));
  command.stdin(Stdio::null());
  env.apply_to(&mut command);

  let output = command.output().await.ok()?;
  if !output.status.success() {
    debug!(tool, code = ?output.status.code(), "toolchain probe failed");
    return None;
  }
  let stdout = String::from_utf8_lossy(&output.stdout);
  let first = stdout.lines().next()?.trim();
  if first.is_empty() { None } else { Some(first.to_string()) }
}

fn shell_command(cmd: &str) -> Command {
  let mut command = Command::new("/bin/sh");
  command.arg("-c").arg(cmd);
  command
}

async fn forward_lines<R: AsyncRead + Unpin>(reader: R, frontend: &Frontend) -> std::io::Result<()> {
  let mut lines = BufReader::new(reader).lines();
  while let Some(line) = lines.next_line().await? {
    frontend.log(line);
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::environment::{ToolPaths, resolve_with};
  use crate::frontend::FrontendEvent;
  use tempfile::TempDir;
  use tokio::sync::mpsc::UnboundedReceiver;

  fn drain_log(rx: &mut UnboundedReceiver<FrontendEvent>) -> Vec<String> {
    let mut lines = Vec::new();
    while let Ok(event) = rx.try_recv() {
      if let FrontendEvent::Log(line) = event {
        lines.push(line);
      }
    }
    lines
  }

  #[tokio::test]
  async fn forwards_every_line_in_order() {
    let (frontend, mut rx) = Frontend::channel();
    run_command("printf 'one\\ntwo\\nthree\\n'", None, None, &frontend)
      .await
      .unwrap();

    let lines = drain_log(&mut rx);
    assert_eq!(lines[0], "$ printf 'one\\ntwo\\nthree\\n'");
    assert_eq!(&lines[1..], ["one", "two", "three"]);
  }

  #[tokio::test]
  async fn nonzero_exit_fails_with_command_string() {
    let (frontend, mut rx) = Frontend::channel();
    let result = run_command("echo before-the-end; exit 3", None, None, &frontend).await;

    match result {
      Err(RunError::CommandFailed { cmd, code }) => {
        assert_eq!(cmd, "echo before-the-end; exit 3");
        assert_eq!(code, Some(3));
      }
      other => panic!("expected CommandFailed, got {other:?}"),
    }
    // Output produced before the failure was still forwarded.
    assert!(drain_log(&mut rx).contains(&"before-the-end".to_string()));
  }

  #[tokio::test]
  async fn stderr_is_forwarded_too() {
    let (frontend, mut rx) = Frontend::channel();
    run_command("echo oops >&2", None, None, &frontend).await.unwrap();
    assert!(drain_log(&mut rx).contains(&"oops".to_string()));
  }

  #[tokio::test]
  async fn honors_working_directory() {
    let temp = TempDir::new().unwrap();
    let frontend = Frontend::sink();
    run_command("touch marker", Some(temp.path()), None, &frontend).await.unwrap();
    assert!(temp.path().join("marker").exists());
  }

  #[tokio::test]
  async fn applies_build_environment() {
    let (frontend, mut rx) = Frontend::channel();
    let env = resolve_with(
      &ToolPaths::default(),
      vec![("PATH".to_string(), "/usr/bin:/bin".to_string()), ("MARKER".to_string(), "42".to_string())],
    );
    run_command("echo value=$MARKER", None, Some(&env), &frontend).await.unwrap();
    assert!(drain_log(&mut rx).contains(&"value=42".to_string()));
  }

  #[tokio::test]
  async fn command_succeeds_reflects_exit_code() {
    assert!(command_succeeds("true", None).await);
    assert!(!command_succeeds("exit 1", None).await);
  }

  #[tokio::test]
  async fn probe_finds_tool_on_path() {
    let temp = TempDir::new().unwrap();
    let tool = temp.path().join("mytool");
    std::fs::write(&tool, "#!/bin/sh\necho 'mytool 1.2.3'\n").unwrap();
    make_executable(&tool);

    let env = resolve_with(
      &ToolPaths::default(),
      vec![("PATH".to_string(), temp.path().display().to_string())],
    );
    assert_eq!(probe_tool("mytool", &env).await.as_deref(), Some("mytool 1.2.3"));
  }

  #[tokio::test]
  async fn probe_of_missing_tool_is_none() {
    let env = resolve_with(
      &ToolPaths::default(),
      vec![("PATH".to_string(), "/nonexistent-bin".to_string())],
    );
    assert_eq!(probe_tool("definitely-not-a-tool", &env).await, None);
  }

  #[cfg(unix)]
  fn make_executable(path: &std::path::Path) {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
  }

  #[cfg(not(unix))]
  fn make_executable(_path: &std::path::Path) {}
}
