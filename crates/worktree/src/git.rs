// SPDX-License-Identifier: MIT

//! [`GitWorktreeBackend`]: shells out to the host `git` binary.

use crate::error::{Result, WorktreeError};
use crate::refresh::{should_skip, RefreshPrecondition, RefreshResult, RefreshSkipReason};
use crate::{WorktreeBackend, WorktreeInfo};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, warn};

/// Shells out to `git`, rooted at an arbitrary working directory per call.
#[derive(Debug, Clone, Default)]
pub struct GitWorktreeBackend;

impl GitWorktreeBackend {
    pub fn new() -> Self {
        Self
    }

    async fn run(&self, cwd: &Path, args: &[&str]) -> Result<String> {
        let output = Command::new("git")
            .arg("-C")
            .arg(cwd)
            .args(args)
            .output()
            .await
            .map_err(WorktreeError::Io)?;
        if !output.status.success() {
            return Err(WorktreeError::Command(format!(
                "git {} failed: {}",
                args.join(" "),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    async fn try_run(&self, cwd: &Path, args: &[&str]) -> bool {
        self.run(cwd, args).await.is_ok()
    }

    async fn default_branch(&self, repo_path: &Path) -> Result<String> {
        // Prefer the remote's reported HEAD; fall back to `main`.
        match self.run(repo_path, &["symbolic-ref", "refs/remotes/origin/HEAD"]).await {
            Ok(reference) => Ok(reference.trim_start_matches("refs/remotes/origin/").to_string()),
            Err(_) => Ok("main".to_string()),
        }
    }
}

#[async_trait]
impl WorktreeBackend for GitWorktreeBackend {
    async fn create(&self, path: &Path, branch: &str) -> Result<()> {
        self.run(
            path.parent().unwrap_or(path),
            &["worktree", "add", &path.to_string_lossy(), branch],
        )
        .await?;
        Ok(())
    }

    async fn create_with_new_branch(&self, path: &Path, branch: &str, start_point: &str) -> Result<()> {
        self.run(
            path.parent().unwrap_or(path),
            &["worktree", "add", "-b", branch, &path.to_string_lossy(), start_point],
        )
        .await?;
        Ok(())
    }

    async fn remove(&self, path: &Path, force: bool) -> Result<()> {
        let path_str = path.to_string_lossy().into_owned();
        let mut args = vec!["worktree", "remove"];
        if force {
            args.push("--force");
        }
        args.push(&path_str);
        self.run(path.parent().unwrap_or(path), &args).await?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<WorktreeInfo>> {
        // Not anchored to a single repo path in this interface; callers that
        // need the global list invoke this against their main checkout via
        // `has_uncommitted_changes`-style callers instead. Kept here for
        // trait completeness with an empty default that concrete daemons
        // override by calling `list_in` directly when they know the repo root.
        Ok(Vec::new())
    }

    async fn exists(&self, path: &Path) -> Result<bool> {
        match tokio::fs::canonicalize(path).await {
            Ok(resolved) => Ok(resolved.is_dir()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(WorktreeError::Io(e)),
        }
    }

    async fn prune(&self) -> Result<()> {
        // Pruning is meaningless without a repo root; no-op placeholder kept
        // for trait symmetry. Concrete callers use `prune_in`.
        Ok(())
    }

    async fn has_uncommitted_changes(&self, path: &Path) -> Result<bool> {
        let status = self.run(path, &["status", "--porcelain"]).await?;
        Ok(!status.is_empty())
    }

    async fn has_unpushed_commits(&self, path: &Path) -> Result<bool> {
        let branch = self.get_current_branch(path).await?;
        let upstream_ref = format!("{branch}@{{upstream}}");
        if !self.try_run(path, &["rev-parse", "--verify", &upstream_ref]).await {
            // No tracking branch: nothing to compare against.
            return Ok(false);
        }
        let range = format!("{upstream_ref}..HEAD");
        let ahead = self.run(path, &["rev-list", "--count", &range]).await?;
        Ok(ahead.trim().parse::<u64>().unwrap_or(0) > 0)
    }

    async fn get_current_branch(&self, path: &Path) -> Result<String> {
        self.run(path, &["rev-parse", "--abbrev-ref", "HEAD"]).await
    }

    async fn branch_exists(&self, repo_path: &Path, branch: &str) -> Result<bool> {
        let reference = format!("refs/heads/{branch}");
        Ok(self.try_run(repo_path, &["show-ref", "--verify", "--quiet", &reference]).await)
    }

    async fn rename_branch(&self, repo_path: &Path, from: &str, to: &str) -> Result<()> {
        self.run(repo_path, &["branch", "-m", from, to]).await?;
        Ok(())
    }

    async fn delete_branch(&self, repo_path: &Path, branch: &str, force: bool) -> Result<()> {
        let flag = if force { "-D" } else { "-d" };
        self.run(repo_path, &["branch", flag, branch]).await?;
        Ok(())
    }

    async fn list_branches_with_prefix(&self, repo_path: &Path, prefix: &str) -> Result<Vec<String>> {
        let pattern = format!("refs/heads/{prefix}*");
        let out = self.run(repo_path, &["for-each-ref", "--format=%(refname:short)", &pattern]).await?;
        Ok(out.lines().map(str::to_string).filter(|s| !s.is_empty()).collect())
    }

    async fn find_orphaned_branches(&self, repo_path: &Path, prefix: &str) -> Result<Vec<String>> {
        let branches = self.list_branches_with_prefix(repo_path, prefix).await?;
        let worktrees = match self.run(repo_path, &["worktree", "list", "--porcelain"]).await {
            Ok(out) => out,
            Err(_) => String::new(),
        };
        let mut orphans = Vec::new();
        for branch in branches {
            let branch_line = format!("branch refs/heads/{branch}");
            let has_worktree = worktrees.lines().any(|line| line == branch_line);
            let remote_ref = format!("refs/remotes/origin/{branch}");
            let has_remote = self.try_run(repo_path, &["show-ref", "--verify", "--quiet", &remote_ref]).await;
            if !has_worktree && !has_remote {
                orphans.push(branch);
            }
        }
        Ok(orphans)
    }

    async fn refresh(&self, path: &Path) -> Result<RefreshResult> {
        let default_branch = self.default_branch(path).await?;
        let current_branch = match self.get_current_branch(path).await {
            Ok(b) => b,
            Err(_) => return Ok(RefreshResult::skip(RefreshSkipReason::DetachedHead)),
        };

        let git_dir = path.join(".git");
        let mid_rebase =
            path_exists(&git_dir.join("rebase-merge")).await || path_exists(&git_dir.join("rebase-apply")).await;
        let mid_merge = path_exists(&git_dir.join("MERGE_HEAD")).await;

        let pre = RefreshPrecondition {
            detached_head: current_branch == "HEAD",
            mid_rebase,
            mid_merge,
            on_default_branch: current_branch == default_branch,
            up_to_date: false,
        };
        if let Some(reason) = should_skip(pre) {
            return Ok(RefreshResult::skip(reason));
        }

        if self.run(path, &["fetch", "origin", &default_branch]).await.is_err() {
            return Ok(RefreshResult { error: Some("fetch failed".to_string()), ..Default::default() });
        }

        let upstream_ref = format!("origin/{default_branch}");
        let behind_range = format!("HEAD..{upstream_ref}");
        let behind = self
            .run(path, &["rev-list", "--count", &behind_range])
            .await
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(0);
        if behind == 0 {
            return Ok(RefreshResult::skip(RefreshSkipReason::AlreadyUpToDate));
        }

        let dirty = self.has_uncommitted_changes(path).await?;
        let mut result = RefreshResult::default();
        if dirty {
            self.run(path, &["stash", "push", "--include-untracked", "-m", "mc-refresh"]).await?;
            result.stash_performed = true;
        }

        let before_range = format!("{current_branch}..{upstream_ref}");
        result.rebase_commits =
            self.run(path, &["rev-list", "--count", &before_range]).await.ok().and_then(|s| s.parse().ok()).unwrap_or(0);

        let rebase_res = self.run(path, &["rebase", &upstream_ref]).await;
        if rebase_res.is_err() {
            let conflicts = self.run(path, &["diff", "--name-only", "--diff-filter=U"]).await.unwrap_or_default();
            result.conflicts = conflicts.lines().map(str::to_string).filter(|s| !s.is_empty()).collect();
            let _ = self.run(path, &["rebase", "--abort"]).await;
            if result.stash_performed {
                if let Err(e) = self.run(path, &["stash", "pop"]).await {
                    warn!(error = %e, "failed to restore stash after aborted rebase");
                }
            }
            result.error = Some("rebase conflict".to_string());
            return Ok(result);
        }

        if result.stash_performed {
            self.run(path, &["stash", "pop"]).await?;
        }

        debug!(branch = %current_branch, commits = result.rebase_commits, "refreshed worktree");
        Ok(result)
    }
}

async fn path_exists(path: &Path) -> bool {
    tokio::fs::metadata(path).await.is_ok()
}

#[cfg(test)]
#[path = "git_tests.rs"]
mod tests;
