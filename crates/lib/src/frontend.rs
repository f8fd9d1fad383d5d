//! The event channel between the orchestration worker and whatever renders it.
//!
//! The worker never touches presentation state directly. It sends
//! [`FrontendEvent`]s over a single-consumer channel; the owning side (a GUI
//! event loop, the CLI, a test) drains and applies them. Channel order is
//! emission order, which is the one externally observable ordering guarantee
//! the core makes: log lines appear as the build produces them.
//!
//! Confirmation is the only request/response interaction: the worker sends a
//! [`FrontendEvent::Confirm`] carrying a oneshot reply slot and awaits the
//! answer, blocked only for as long as the user takes to respond.

use tokio::sync::{mpsc, oneshot};
use tracing::debug;

/// How a notification should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
  Info,
  Warning,
  Error,
}

/// One message from the orchestration worker to the frontend.
#[derive(Debug)]
pub enum FrontendEvent {
  /// Append a line to the live build log.
  Log(String),

  /// Set the coarse progress indicator (0.0 ..= 100.0).
  Progress(f64),

  /// Surface a notification dialog (or its CLI equivalent).
  Notify {
    severity: Severity,
    title: String,
    message: String,
  },

  /// Ask a yes/no question; the answer goes back through `reply`.
  Confirm {
    title: String,
    message: String,
    reply: oneshot::Sender<bool>,
  },
}

/// Cheap clonable handle the worker side uses to emit events.
///
/// Once the consumer is gone every send becomes a no-op and [`Frontend::confirm`]
/// answers `false`; a build racing a closed frontend must not panic, it just
/// loses its audience.
#[derive(Debug, Clone)]
pub struct Frontend {
  tx: mpsc::UnboundedSender<FrontendEvent>,
}

impl Frontend {
  /// Create a frontend handle and the receiving end to drain.
  pub fn channel() -> (Self, mpsc::UnboundedReceiver<FrontendEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Self { tx }, rx)
  }

  /// A frontend that discards everything. For tests and headless callers.
  pub fn sink() -> Self {
    let (frontend, _rx) = Self::channel();
    frontend
  }

  /// Append a line to the live build log.
  pub fn log(&self, line: impl Into<String>) {
    let _ = self.tx.send(FrontendEvent::Log(line.into()));
  }

  /// Update the coarse progress indicator.
  pub fn progress(&self, percent: f64) {
    let _ = self.tx.send(FrontendEvent::Progress(percent));
  }

  /// Surface a notification.
  pub fn notify(&self, severity: Severity, title: &str, message: &str) {
    let _ = self.tx.send(FrontendEvent::Notify {
      severity,
      title: title.to_string(),
      message: message.to_string(),
    });
  }

  /// Ask a yes/no question and wait for the answer.
  ///
  /// Returns `false` when the consumer is gone or drops the reply slot.
  pub async fn confirm(&self, title: &str, message: &str) -> bool {
    let (reply, answer) = oneshot::channel();
    let sent = self.tx.send(FrontendEvent::Confirm {
      title: title.to_string(),
      message: message.to_string(),
      reply,
    });
    if sent.is_err() {
      debug!(title, "confirm with no frontend attached, answering no");
      return false;
    }
    answer.await.unwrap_or(false)
  }
}
