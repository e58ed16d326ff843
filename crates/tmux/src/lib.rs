// SPDX-License-Identifier: MIT

//! mc-tmux: the terminal multiplexer interface (§4.3).
//!
//! [`MultiplexerBackend`] is a contract over the host terminal multiplexer,
//! not an implementation detail baked into the daemon. [`TmuxBackend`] shells
//! out to `tmux`; a fake is available under `test-support`, mirroring
//! mc-worktree's backend-plus-fake split.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod error;
mod tmux;

#[cfg(any(test, feature = "test-support"))]
mod fake;

pub use error::{MultiplexerError, Result};
pub use tmux::TmuxBackend;

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeMultiplexerBackend;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// A single pane-output capture started by [`MultiplexerBackend::start_pipe_pane`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaneHandle {
    pub session: String,
    pub window: String,
    pub pid: i32,
}

/// Backend abstraction over a terminal multiplexer (tmux, in production).
///
/// All methods accept a [`CancellationToken`] and must return
/// [`MultiplexerError::Cancelled`] promptly once it is triggered, rather than
/// leaving a shelled-out child process to finish on its own.
#[async_trait]
pub trait MultiplexerBackend: Send + Sync {
    async fn create_session(&self, name: &str, detached: bool, cancel: &CancellationToken) -> Result<()>;

    async fn kill_session(&self, name: &str, cancel: &CancellationToken) -> Result<()>;

    async fn has_session(&self, name: &str, cancel: &CancellationToken) -> Result<bool>;

    async fn list_sessions(&self, cancel: &CancellationToken) -> Result<Vec<String>>;

    async fn create_window(&self, session: &str, name: &str, cancel: &CancellationToken) -> Result<()>;

    async fn kill_window(&self, session: &str, name: &str, cancel: &CancellationToken) -> Result<()>;

    /// Exact match only: a window named `worker-1` must not be reported as
    /// present when only `worker-10` exists.
    async fn has_window(&self, session: &str, name: &str, cancel: &CancellationToken) -> Result<bool>;

    async fn list_windows(&self, session: &str, cancel: &CancellationToken) -> Result<Vec<String>>;

    async fn get_pane_pid(&self, session: &str, window: &str, cancel: &CancellationToken) -> Result<i32>;

    /// Sends `text` followed by an Enter keystroke, as if typed interactively.
    async fn send_keys(&self, session: &str, window: &str, text: &str, cancel: &CancellationToken) -> Result<()>;

    /// Sends `text` verbatim via a paste buffer, without a trailing Enter.
    /// Embedded newlines are delivered as literal newlines, not as Enter
    /// keystrokes that would submit partial lines.
    async fn send_keys_literal(&self, session: &str, window: &str, text: &str, cancel: &CancellationToken) -> Result<()>;

    /// Atomically pastes `text` and then submits it with a single Enter.
    async fn send_keys_literal_with_enter(
        &self,
        session: &str,
        window: &str,
        text: &str,
        cancel: &CancellationToken,
    ) -> Result<()>;

    async fn start_pipe_pane(
        &self,
        session: &str,
        window: &str,
        output_file: &std::path::Path,
        cancel: &CancellationToken,
    ) -> Result<()>;

    async fn stop_pipe_pane(&self, session: &str, window: &str, cancel: &CancellationToken) -> Result<()>;
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
