// SPDX-License-Identifier: MIT

//! In-memory fake of [`MultiplexerBackend`] for daemon-level unit tests.

use crate::error::{MultiplexerError, Result};
use crate::MultiplexerBackend;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone)]
pub struct SentKeys {
    pub session: String,
    pub window: String,
    pub text: String,
    pub literal: bool,
}

#[derive(Debug, Default)]
struct State {
    sessions: HashMap<String, Vec<String>>,
    pane_pids: HashMap<(String, String), i32>,
    next_pid: i32,
    sent: Vec<SentKeys>,
    piped: HashMap<(String, String), PathBuf>,
}

/// Fully in-memory stand-in for [`crate::TmuxBackend`].
#[derive(Clone, Default)]
pub struct FakeMultiplexerBackend {
    state: Arc<Mutex<State>>,
}

impl FakeMultiplexerBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent_keys(&self) -> Vec<SentKeys> {
        self.state.lock().sent.clone()
    }

    pub fn is_piping(&self, session: &str, window: &str) -> bool {
        self.state.lock().piped.contains_key(&(session.to_string(), window.to_string()))
    }

    fn check_cancel(cancel: &CancellationToken) -> Result<()> {
        if cancel.is_cancelled() {
            return Err(MultiplexerError::Cancelled);
        }
        Ok(())
    }
}

#[async_trait]
impl MultiplexerBackend for FakeMultiplexerBackend {
    async fn create_session(&self, name: &str, _detached: bool, cancel: &CancellationToken) -> Result<()> {
        Self::check_cancel(cancel)?;
        self.state.lock().sessions.entry(name.to_string()).or_default();
        Ok(())
    }

    async fn kill_session(&self, name: &str, cancel: &CancellationToken) -> Result<()> {
        Self::check_cancel(cancel)?;
        let mut state = self.state.lock();
        if state.sessions.remove(name).is_none() {
            return Err(MultiplexerError::SessionNotFound(name.to_string()));
        }
        Ok(())
    }

    async fn has_session(&self, name: &str, cancel: &CancellationToken) -> Result<bool> {
        Self::check_cancel(cancel)?;
        Ok(self.state.lock().sessions.contains_key(name))
    }

    async fn list_sessions(&self, cancel: &CancellationToken) -> Result<Vec<String>> {
        Self::check_cancel(cancel)?;
        Ok(self.state.lock().sessions.keys().cloned().collect())
    }

    async fn create_window(&self, session: &str, name: &str, cancel: &CancellationToken) -> Result<()> {
        Self::check_cancel(cancel)?;
        let mut state = self.state.lock();
        let windows = state.sessions.get_mut(session).ok_or_else(|| MultiplexerError::SessionNotFound(session.to_string()))?;
        windows.push(name.to_string());
        let pid = state.next_pid + 1000;
        state.next_pid = pid;
        state.pane_pids.insert((session.to_string(), name.to_string()), pid);
        Ok(())
    }

    async fn kill_window(&self, session: &str, name: &str, cancel: &CancellationToken) -> Result<()> {
        Self::check_cancel(cancel)?;
        let mut state = self.state.lock();
        let windows = state.sessions.get_mut(session).ok_or_else(|| MultiplexerError::SessionNotFound(session.to_string()))?;
        let before = windows.len();
        windows.retain(|w| w != name);
        if windows.len() == before {
            return Err(MultiplexerError::WindowNotFound(session.to_string(), name.to_string()));
        }
        state.pane_pids.remove(&(session.to_string(), name.to_string()));
        Ok(())
    }

    async fn has_window(&self, session: &str, name: &str, cancel: &CancellationToken) -> Result<bool> {
        Self::check_cancel(cancel)?;
        let state = self.state.lock();
        Ok(state.sessions.get(session).map(|ws| ws.iter().any(|w| w == name)).unwrap_or(false))
    }

    async fn list_windows(&self, session: &str, cancel: &CancellationToken) -> Result<Vec<String>> {
        Self::check_cancel(cancel)?;
        let state = self.state.lock();
        state.sessions.get(session).cloned().ok_or_else(|| MultiplexerError::SessionNotFound(session.to_string()))
    }

    async fn get_pane_pid(&self, session: &str, window: &str, cancel: &CancellationToken) -> Result<i32> {
        Self::check_cancel(cancel)?;
        let state = self.state.lock();
        state
            .pane_pids
            .get(&(session.to_string(), window.to_string()))
            .copied()
            .ok_or_else(|| MultiplexerError::WindowNotFound(session.to_string(), window.to_string()))
    }

    async fn send_keys(&self, session: &str, window: &str, text: &str, cancel: &CancellationToken) -> Result<()> {
        Self::check_cancel(cancel)?;
        if !self.has_window(session, window, cancel).await? {
            return Err(MultiplexerError::WindowNotFound(session.to_string(), window.to_string()));
        }
        self.state.lock().sent.push(SentKeys {
            session: session.to_string(),
            window: window.to_string(),
            text: text.to_string(),
            literal: false,
        });
        Ok(())
    }

    async fn send_keys_literal(&self, session: &str, window: &str, text: &str, cancel: &CancellationToken) -> Result<()> {
        Self::check_cancel(cancel)?;
        if !self.has_window(session, window, cancel).await? {
            return Err(MultiplexerError::WindowNotFound(session.to_string(), window.to_string()));
        }
        self.state.lock().sent.push(SentKeys {
            session: session.to_string(),
            window: window.to_string(),
            text: text.to_string(),
            literal: true,
        });
        Ok(())
    }

    async fn send_keys_literal_with_enter(
        &self,
        session: &str,
        window: &str,
        text: &str,
        cancel: &CancellationToken,
    ) -> Result<()> {
        self.send_keys_literal(session, window, text, cancel).await
    }

    async fn start_pipe_pane(
        &self,
        session: &str,
        window: &str,
        output_file: &Path,
        cancel: &CancellationToken,
    ) -> Result<()> {
        Self::check_cancel(cancel)?;
        if !self.has_window(session, window, cancel).await? {
            return Err(MultiplexerError::WindowNotFound(session.to_string(), window.to_string()));
        }
        self.state.lock().piped.insert((session.to_string(), window.to_string()), output_file.to_path_buf());
        Ok(())
    }

    async fn stop_pipe_pane(&self, session: &str, window: &str, cancel: &CancellationToken) -> Result<()> {
        Self::check_cancel(cancel)?;
        if !self.has_window(session, window, cancel).await? {
            return Err(MultiplexerError::WindowNotFound(session.to_string(), window.to_string()));
        }
        self.state.lock().piped.remove(&(session.to_string(), window.to_string()));
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
