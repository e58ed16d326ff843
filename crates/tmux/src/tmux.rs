// SPDX-License-Identifier: MIT

//! [`TmuxBackend`]: shells out to the host `tmux` binary.

use crate::error::{MultiplexerError, Result};
use crate::MultiplexerBackend;
use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Shells out to `tmux -L <socket>` so a daemon can own a private server
/// rather than colliding with a user's interactive tmux session.
#[derive(Debug, Clone)]
pub struct TmuxBackend {
    socket: String,
}

impl TmuxBackend {
    pub fn new(socket: impl Into<String>) -> Self {
        Self { socket: socket.into() }
    }

    async fn run(&self, args: &[&str], cancel: &CancellationToken) -> Result<String> {
        let mut cmd = Command::new("tmux");
        cmd.arg("-L").arg(&self.socket).args(args);

        let output = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(MultiplexerError::Cancelled),
            result = cmd.output() => result.map_err(MultiplexerError::Io)?,
        };

        if !output.status.success() {
            return Err(MultiplexerError::Command(format!(
                "tmux {} failed: {}",
                args.join(" "),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    async fn try_run(&self, args: &[&str], cancel: &CancellationToken) -> bool {
        self.run(args, cancel).await.is_ok()
    }

    fn target_window(session: &str, window: &str) -> String {
        format!("{session}:{window}")
    }
}

#[async_trait]
impl MultiplexerBackend for TmuxBackend {
    async fn create_session(&self, name: &str, detached: bool, cancel: &CancellationToken) -> Result<()> {
        let mut args = vec!["new-session", "-s", name];
        if detached {
            args.push("-d");
        }
        self.run(&args, cancel).await?;
        Ok(())
    }

    async fn kill_session(&self, name: &str, cancel: &CancellationToken) -> Result<()> {
        if !self.has_session(name, cancel).await? {
            return Err(MultiplexerError::SessionNotFound(name.to_string()));
        }
        self.run(&["kill-session", "-t", name], cancel).await?;
        Ok(())
    }

    async fn has_session(&self, name: &str, cancel: &CancellationToken) -> Result<bool> {
        Ok(self.try_run(&["has-session", "-t", name], cancel).await)
    }

    async fn list_sessions(&self, cancel: &CancellationToken) -> Result<Vec<String>> {
        match self.run(&["list-sessions", "-F", "#{session_name}"], cancel).await {
            Ok(out) => Ok(out.lines().map(str::to_string).filter(|s| !s.is_empty()).collect()),
            Err(MultiplexerError::Command(_)) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    async fn create_window(&self, session: &str, name: &str, cancel: &CancellationToken) -> Result<()> {
        if !self.has_session(session, cancel).await? {
            return Err(MultiplexerError::SessionNotFound(session.to_string()));
        }
        self.run(&["new-window", "-t", session, "-n", name], cancel).await?;
        Ok(())
    }

    async fn kill_window(&self, session: &str, name: &str, cancel: &CancellationToken) -> Result<()> {
        if !self.has_window(session, name, cancel).await? {
            return Err(MultiplexerError::WindowNotFound(session.to_string(), name.to_string()));
        }
        self.run(&["kill-window", "-t", &Self::target_window(session, name)], cancel).await?;
        Ok(())
    }

    async fn has_window(&self, session: &str, name: &str, cancel: &CancellationToken) -> Result<bool> {
        let windows = self.list_windows(session, cancel).await?;
        Ok(windows.iter().any(|w| w == name))
    }

    async fn list_windows(&self, session: &str, cancel: &CancellationToken) -> Result<Vec<String>> {
        if !self.has_session(session, cancel).await? {
            return Err(MultiplexerError::SessionNotFound(session.to_string()));
        }
        let out = self.run(&["list-windows", "-t", session, "-F", "#{window_name}"], cancel).await?;
        Ok(out.lines().map(str::to_string).filter(|s| !s.is_empty()).collect())
    }

    async fn get_pane_pid(&self, session: &str, window: &str, cancel: &CancellationToken) -> Result<i32> {
        if !self.has_window(session, window, cancel).await? {
            return Err(MultiplexerError::WindowNotFound(session.to_string(), window.to_string()));
        }
        let target = Self::target_window(session, window);
        let out = self.run(&["list-panes", "-t", &target, "-F", "#{pane_pid}"], cancel).await?;
        out.lines()
            .next()
            .and_then(|s| s.trim().parse::<i32>().ok())
            .ok_or_else(|| MultiplexerError::Command(format!("no pane pid for {target}")))
    }

    async fn send_keys(&self, session: &str, window: &str, text: &str, cancel: &CancellationToken) -> Result<()> {
        if !self.has_window(session, window, cancel).await? {
            return Err(MultiplexerError::WindowNotFound(session.to_string(), window.to_string()));
        }
        let target = Self::target_window(session, window);
        self.run(&["send-keys", "-t", &target, text, "Enter"], cancel).await?;
        Ok(())
    }

    async fn send_keys_literal(&self, session: &str, window: &str, text: &str, cancel: &CancellationToken) -> Result<()> {
        if !self.has_window(session, window, cancel).await? {
            return Err(MultiplexerError::WindowNotFound(session.to_string(), window.to_string()));
        }
        let target = Self::target_window(session, window);
        let buffer_name = format!("mc-paste-{}-{}", session, window);
        self.run(&["set-buffer", "-b", &buffer_name, text], cancel).await?;
        self.run(&["paste-buffer", "-b", &buffer_name, "-t", &target], cancel).await?;
        self.run(&["delete-buffer", "-b", &buffer_name], cancel).await?;
        Ok(())
    }

    async fn send_keys_literal_with_enter(
        &self,
        session: &str,
        window: &str,
        text: &str,
        cancel: &CancellationToken,
    ) -> Result<()> {
        self.send_keys_literal(session, window, text, cancel).await?;
        let target = Self::target_window(session, window);
        self.run(&["send-keys", "-t", &target, "Enter"], cancel).await?;
        Ok(())
    }

    async fn start_pipe_pane(
        &self,
        session: &str,
        window: &str,
        output_file: &Path,
        cancel: &CancellationToken,
    ) -> Result<()> {
        if !self.has_window(session, window, cancel).await? {
            return Err(MultiplexerError::WindowNotFound(session.to_string(), window.to_string()));
        }
        let target = Self::target_window(session, window);
        let shell_cmd = format!("cat >> {}", shell_quote(&output_file.to_string_lossy()));
        self.run(&["pipe-pane", "-t", &target, "-o", &shell_cmd], cancel).await?;
        debug!(session, window, path = %output_file.display(), "started pipe-pane capture");
        Ok(())
    }

    async fn stop_pipe_pane(&self, session: &str, window: &str, cancel: &CancellationToken) -> Result<()> {
        if !self.has_window(session, window, cancel).await? {
            return Err(MultiplexerError::WindowNotFound(session.to_string(), window.to_string()));
        }
        let target = Self::target_window(session, window);
        self.run(&["pipe-pane", "-t", &target], cancel).await?;
        Ok(())
    }
}

fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "'\\''"))
}

#[cfg(test)]
#[path = "tmux_tests.rs"]
mod tests;
