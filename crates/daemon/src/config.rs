// SPDX-License-Identifier: MIT

//! Daemon configuration and the filesystem layout rooted under a single
//! state directory (§6.5).

use std::path::PathBuf;
use std::time::Duration;

/// All paths the daemon needs, plus the small set of opt-in behavior flags
/// that spec.md leaves unnamed (§4.9 cleanup loop, health loop).
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    /// Root state directory (e.g. `~/.local/state/multiclaude`).
    pub state_dir: PathBuf,
    pub socket_path: PathBuf,
    pub pid_path: PathBuf,
    pub log_path: PathBuf,
    pub state_path: PathBuf,
    pub worktrees_root: PathBuf,
    pub messages_root: PathBuf,
    pub output_root: PathBuf,
    /// `tmux -L <tmux_socket>`: the private tmux server this daemon instance
    /// owns, distinct from any interactive session the operator runs.
    pub tmux_socket: String,
    /// Path to the TOML notification config, if notifications are enabled.
    pub notify_config_path: Option<PathBuf>,

    pub health_interval: Duration,
    pub message_router_interval: Duration,
    pub cleanup_interval: Duration,

    /// The health loop only logs orphan sessions unless this is set (Open
    /// Question resolution #2).
    pub auto_kill_orphan_sessions: bool,
    /// Opt-in branch reaping cadence for the cleanup loop.
    pub reap_merged_branches: bool,
    pub reap_interval: Duration,
}

impl DaemonConfig {
    /// Derive the full filesystem layout from a single root directory,
    /// mirroring the teacher's `Config::load` which derives every path from
    /// `state_dir`.
    pub fn for_state_dir(state_dir: impl Into<PathBuf>) -> Self {
        let state_dir = state_dir.into();
        Self {
            socket_path: state_dir.join("daemon.sock"),
            pid_path: state_dir.join("daemon.pid"),
            log_path: state_dir.join("daemon.log"),
            state_path: state_dir.join("state.json"),
            worktrees_root: state_dir.join("wts"),
            messages_root: state_dir.join("messages"),
            output_root: state_dir.join("output"),
            tmux_socket: "multiclaude".to_string(),
            notify_config_path: None,
            health_interval: Duration::from_secs(30),
            message_router_interval: Duration::from_secs(2),
            cleanup_interval: Duration::from_secs(60),
            auto_kill_orphan_sessions: false,
            reap_merged_branches: false,
            reap_interval: Duration::from_secs(3600),
            state_dir,
        }
    }

    /// Resolve the default state directory: `MULTICLAUDE_STATE_DIR` >
    /// `XDG_STATE_HOME/multiclaude` > `~/.local/state/multiclaude`, the same
    /// precedence order as the teacher's `env::state_dir`.
    pub fn default_state_dir() -> PathBuf {
        if let Ok(dir) = std::env::var("MULTICLAUDE_STATE_DIR") {
            return PathBuf::from(dir);
        }
        if let Some(state_home) = std::env::var_os("XDG_STATE_HOME") {
            return PathBuf::from(state_home).join("multiclaude");
        }
        dirs::state_dir().unwrap_or_else(|| dirs::home_dir().unwrap_or_default().join(".local/state")).join("multiclaude")
    }

    pub fn default_for_this_host() -> Self {
        Self::for_state_dir(Self::default_state_dir())
    }

    pub fn ensure_directories(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.state_dir)?;
        std::fs::create_dir_all(&self.worktrees_root)?;
        std::fs::create_dir_all(&self.messages_root)?;
        std::fs::create_dir_all(&self.output_root)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
