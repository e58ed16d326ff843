// SPDX-License-Identifier: MIT

//! In-memory fake of [`WorktreeBackend`] for daemon-level unit tests.

use crate::error::{Result, WorktreeError};
use crate::refresh::{RefreshResult, RefreshSkipReason};
use crate::{WorktreeBackend, WorktreeInfo};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Default)]
struct State {
    worktrees: HashMap<PathBuf, String>,
    branches: HashSet<String>,
    dirty: HashSet<PathBuf>,
    unpushed: HashSet<PathBuf>,
}

/// Fully in-memory stand-in for [`crate::GitWorktreeBackend`], for tests that
/// don't want to shell out to a real `git` binary.
#[derive(Clone, Default)]
pub struct FakeWorktreeBackend {
    state: Arc<Mutex<State>>,
}

impl FakeWorktreeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_dirty(&self, path: &Path) {
        self.state.lock().dirty.insert(path.to_path_buf());
    }

    pub fn mark_unpushed(&self, path: &Path) {
        self.state.lock().unpushed.insert(path.to_path_buf());
    }

    pub fn add_branch(&self, name: &str) {
        self.state.lock().branches.insert(name.to_string());
    }
}

#[async_trait]
impl WorktreeBackend for FakeWorktreeBackend {
    async fn create(&self, path: &Path, branch: &str) -> Result<()> {
        self.state.lock().worktrees.insert(path.to_path_buf(), branch.to_string());
        Ok(())
    }

    async fn create_with_new_branch(&self, path: &Path, branch: &str, _start_point: &str) -> Result<()> {
        let mut state = self.state.lock();
        state.branches.insert(branch.to_string());
        state.worktrees.insert(path.to_path_buf(), branch.to_string());
        Ok(())
    }

    async fn remove(&self, path: &Path, force: bool) -> Result<()> {
        let mut state = self.state.lock();
        if !force && state.dirty.contains(path) {
            return Err(WorktreeError::Command("dirty worktree, use force".to_string()));
        }
        state.worktrees.remove(path);
        state.dirty.remove(path);
        state.unpushed.remove(path);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<WorktreeInfo>> {
        let state = self.state.lock();
        Ok(state
            .worktrees
            .iter()
            .map(|(path, branch)| WorktreeInfo {
                path: path.clone(),
                commit: "0".repeat(40),
                branch: Some(branch.clone()),
            })
            .collect())
    }

    async fn exists(&self, path: &Path) -> Result<bool> {
        Ok(self.state.lock().worktrees.contains_key(path))
    }

    async fn prune(&self) -> Result<()> {
        Ok(())
    }

    async fn has_uncommitted_changes(&self, path: &Path) -> Result<bool> {
        Ok(self.state.lock().dirty.contains(path))
    }

    async fn has_unpushed_commits(&self, path: &Path) -> Result<bool> {
        Ok(self.state.lock().unpushed.contains(path))
    }

    async fn get_current_branch(&self, path: &Path) -> Result<String> {
        self.state
            .lock()
            .worktrees
            .get(path)
            .cloned()
            .ok_or_else(|| WorktreeError::NotFound(path.display().to_string()))
    }

    async fn branch_exists(&self, _repo_path: &Path, branch: &str) -> Result<bool> {
        Ok(self.state.lock().branches.contains(branch))
    }

    async fn rename_branch(&self, _repo_path: &Path, from: &str, to: &str) -> Result<()> {
        let mut state = self.state.lock();
        if !state.branches.remove(from) {
            return Err(WorktreeError::BranchNotFound(from.to_string()));
        }
        state.branches.insert(to.to_string());
        Ok(())
    }

    async fn delete_branch(&self, _repo_path: &Path, branch: &str, _force: bool) -> Result<()> {
        self.state.lock().branches.remove(branch);
        Ok(())
    }

    async fn list_branches_with_prefix(&self, _repo_path: &Path, prefix: &str) -> Result<Vec<String>> {
        Ok(self.state.lock().branches.iter().filter(|b| b.starts_with(prefix)).cloned().collect())
    }

    async fn find_orphaned_branches(&self, repo_path: &Path, prefix: &str) -> Result<Vec<String>> {
        let branches = self.list_branches_with_prefix(repo_path, prefix).await?;
        let state = self.state.lock();
        Ok(branches
            .into_iter()
            .filter(|b| !state.worktrees.values().any(|wb| wb == b))
            .collect())
    }

    async fn refresh(&self, path: &Path) -> Result<RefreshResult> {
        if self.state.lock().dirty.contains(path) {
            return Ok(RefreshResult {
                stash_performed: true,
                rebase_commits: 1,
                ..Default::default()
            });
        }
        Ok(RefreshResult::skip(RefreshSkipReason::AlreadyUpToDate))
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
