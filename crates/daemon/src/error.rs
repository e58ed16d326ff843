// SPDX-License-Identifier: MIT

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("failed to acquire pid lock at {0}: daemon already running (pid {1})")]
    LockHeld(std::path::PathBuf, i32),

    #[error("failed to bind control socket at {0}: {1}")]
    BindFailed(std::path::PathBuf, std::io::Error),

    #[error("worktree {0} has uncommitted or unpushed changes; refusing to remove agent")]
    UnsafeCleanup(std::path::PathBuf),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store error: {0}")]
    Store(#[from] mc_store::StoreError),

    #[error("wire error: {0}")]
    Wire(#[from] mc_wire::WireError),

    #[error("multiplexer error: {0}")]
    Multiplexer(#[from] mc_tmux::MultiplexerError),

    #[error("worktree error: {0}")]
    Worktree(#[from] mc_worktree::WorktreeError),

    #[error("config error: {0}")]
    Config(String),
}

impl From<DaemonError> for mc_core::Error {
    fn from(e: DaemonError) -> Self {
        match e {
            DaemonError::LockHeld(_, _) => mc_core::Error::fatal(e.to_string()),
            DaemonError::BindFailed(_, _) => mc_core::Error::fatal(e.to_string()),
            DaemonError::UnsafeCleanup(_) => mc_core::Error::conflict(e.to_string()),
            DaemonError::Io(err) => err.into(),
            DaemonError::Store(err) => err.into(),
            DaemonError::Wire(err) => err.into(),
            DaemonError::Multiplexer(err) => err.into(),
            DaemonError::Worktree(err) => err.into(),
            DaemonError::Config(msg) => mc_core::Error::invalid_argument(msg),
        }
    }
}

pub type Result<T> = std::result::Result<T, DaemonError>;
