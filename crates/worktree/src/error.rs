// SPDX-License-Identifier: MIT

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorktreeError {
    #[error("worktree not found: {0}")]
    NotFound(String),

    #[error("branch not found: {0}")]
    BranchNotFound(String),

    #[error("git command failed: {0}")]
    Command(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<WorktreeError> for mc_core::Error {
    fn from(e: WorktreeError) -> Self {
        match &e {
            WorktreeError::NotFound(_) => mc_core::Error::not_found(e.to_string()),
            WorktreeError::BranchNotFound(_) => mc_core::Error::not_found(e.to_string()),
            WorktreeError::Command(_) => mc_core::Error::transient(e.to_string()),
            WorktreeError::Io(_) => mc_core::Error::transient(e.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, WorktreeError>;
