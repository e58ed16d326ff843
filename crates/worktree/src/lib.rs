// SPDX-License-Identifier: MIT

//! mc-worktree: the git worktree interface (§4.2).
//!
//! [`WorktreeBackend`] is a thin contract over the host `git` binary. The
//! real implementation ([`GitWorktreeBackend`]) shells out; a fake
//! implementation is available under the `test-support` feature for the
//! daemon's unit tests, mirroring the teacher's adapter-trait-plus-fake
//! idiom (`oj-adapters::notify::{NotifyAdapter, FakeNotifyAdapter}`).

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod error;
mod git;
mod refresh;

#[cfg(any(test, feature = "test-support"))]
mod fake;

pub use error::{Result, WorktreeError};
pub use git::GitWorktreeBackend;
pub use refresh::{RefreshResult, RefreshSkipReason};

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeWorktreeBackend;

use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// One entry from `git worktree list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorktreeInfo {
    pub path: PathBuf,
    pub commit: String,
    pub branch: Option<String>,
}

/// The git worktree interface (§4.2). All operations take a repository path
/// (the worktree or the main checkout, depending on the operation).
#[async_trait]
pub trait WorktreeBackend: Send + Sync {
    async fn create(&self, path: &Path, branch: &str) -> Result<()>;
    async fn create_with_new_branch(&self, path: &Path, branch: &str, start_point: &str) -> Result<()>;
    async fn remove(&self, path: &Path, force: bool) -> Result<()>;
    async fn list(&self) -> Result<Vec<WorktreeInfo>>;
    /// Symlink-resolved existence check.
    async fn exists(&self, path: &Path) -> Result<bool>;
    async fn prune(&self) -> Result<()>;
    async fn has_uncommitted_changes(&self, path: &Path) -> Result<bool>;
    async fn has_unpushed_commits(&self, path: &Path) -> Result<bool>;
    async fn get_current_branch(&self, path: &Path) -> Result<String>;

    async fn branch_exists(&self, repo_path: &Path, branch: &str) -> Result<bool>;
    async fn rename_branch(&self, repo_path: &Path, from: &str, to: &str) -> Result<()>;
    async fn delete_branch(&self, repo_path: &Path, branch: &str, force: bool) -> Result<()>;
    async fn list_branches_with_prefix(&self, repo_path: &Path, prefix: &str) -> Result<Vec<String>>;
    /// Local branches with no matching worktree and no matching remote-tracking branch.
    async fn find_orphaned_branches(&self, repo_path: &Path, prefix: &str) -> Result<Vec<String>>;

    /// Fetch the upstream default branch and rebase the current branch onto
    /// it, stashing and popping dirty changes automatically. See
    /// [`RefreshResult`] and the state machine documented on
    /// [`refresh::should_skip`].
    async fn refresh(&self, path: &Path) -> Result<RefreshResult>;

    /// Migrate the legacy `workspace` branch to `workspace/default`.
    ///
    /// Returns `Ok(true)` if a migration happened, `Ok(false)` if nothing
    /// needed to change, or a [`WorktreeError::Command`] wrapping a conflict
    /// message when both names already exist and a human must resolve it.
    async fn migrate_legacy_workspace_branch(&self, repo_path: &Path) -> Result<bool> {
        let legacy = "workspace";
        let canonical = "workspace/default";
        let has_legacy = self.branch_exists(repo_path, legacy).await?;
        let has_canonical = self.branch_exists(repo_path, canonical).await?;
        match (has_legacy, has_canonical) {
            (false, _) => Ok(false),
            (true, false) => {
                self.rename_branch(repo_path, legacy, canonical).await?;
                Ok(true)
            }
            (true, true) => Err(WorktreeError::Command(format!(
                "both '{legacy}' and '{canonical}' exist; manual resolution required"
            ))),
        }
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
