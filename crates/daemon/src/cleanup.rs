// SPDX-License-Identifier: MIT

//! Cleanup loop (§4.9): agents with `ready_for_cleanup=true` are torn down
//! once it's safe. A worker with uncommitted or unpushed work is held, not
//! force-removed (§7 ordering fault handling).

use mc_core::{Event, EventType, Priority};
use mc_notify::NotificationHub;
use mc_store::{MessageStore, StateStore};
use mc_tmux::MultiplexerBackend;
use mc_worktree::WorktreeBackend;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub struct CleanupLoop {
    pub state: Arc<StateStore>,
    pub messages: Arc<MessageStore>,
    pub tmux: Arc<dyn MultiplexerBackend>,
    pub worktree: Arc<dyn WorktreeBackend>,
    pub hub: Arc<NotificationHub>,
    pub interval: Duration,
    pub worktrees_root: std::path::PathBuf,
    pub reap_merged_branches: bool,
    pub reap_interval: Duration,
}

impl CleanupLoop {
    pub async fn run(&self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.interval);
        let mut reap_ticker = tokio::time::interval(self.reap_interval);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("cleanup loop cancelled");
                    return;
                }
                _ = ticker.tick() => {
                    self.tick(&cancel).await;
                }
                _ = reap_ticker.tick(), if self.reap_merged_branches => {
                    self.reap_branches().await;
                }
            }
        }
    }

    async fn tick(&self, cancel: &CancellationToken) {
        for repo in self.state.get_all_repos() {
            let candidates: Vec<_> = repo.agents.values().filter(|a| a.ready_for_cleanup).cloned().collect();
            for agent in candidates {
                self.cleanup_agent(&repo.name, &repo.tmux_session, &agent, cancel).await;
            }

            let valid_agents: std::collections::HashSet<String> =
                match self.state.get_all_repos().into_iter().find(|r| r.name == repo.name) {
                    Some(r) => r.agents.into_keys().collect(),
                    None => continue,
                };
            if let Err(e) = self.messages.cleanup_orphaned(&repo.name, &valid_agents) {
                debug!(repo = %repo.name, error = %e, "inbox cleanup-orphaned pass failed");
            }
        }

        if let Err(e) = self.worktree.prune().await {
            warn!(error = %e, "failed to prune git worktree bookkeeping");
        }
        self.remove_orphaned_worktree_dirs().await;
    }

    async fn cleanup_agent(&self, repo: &str, tmux_session: &str, agent: &mc_core::Agent, cancel: &CancellationToken) {
        if agent.kind.owns_dedicated_worktree() {
            let uncommitted = self.worktree.has_uncommitted_changes(&agent.worktree_path).await.unwrap_or(false);
            let unpushed = self.worktree.has_unpushed_commits(&agent.worktree_path).await.unwrap_or(false);
            if uncommitted || unpushed {
                warn!(repo, agent = %agent.name, "holding agent: worktree has unsaved work");
                let mut event = Event::new(repo, EventType::AgentError, "agent held for cleanup", "worktree has uncommitted or unpushed changes");
                event.agent_name = Some(agent.name.clone());
                event.priority = Priority::High;
                let _ = self.hub.notify(event).await;
                return;
            }
        }

        if let Err(e) = self.tmux.kill_window(tmux_session, &agent.tmux_window, cancel).await {
            debug!(repo, agent = %agent.name, error = %e, "window already gone");
        }

        if agent.kind.owns_dedicated_worktree() {
            if let Err(e) = self.worktree.remove(&agent.worktree_path, false).await {
                warn!(repo, agent = %agent.name, error = %e, "graceful worktree removal failed, forcing");
                let mut event = Event::new(repo, EventType::AgentError, "forcing worktree removal", &agent.worktree_path.display().to_string());
                event.agent_name = Some(agent.name.clone());
                let _ = self.hub.notify(event).await;
                if let Err(e) = self.worktree.remove(&agent.worktree_path, true).await {
                    warn!(repo, agent = %agent.name, error = %e, "forced worktree removal failed");
                }
            }
        }

        match self.state.remove_agent(repo, &agent.name) {
            Ok(_) => info!(repo, agent = %agent.name, "agent cleaned up"),
            Err(e) => warn!(repo, agent = %agent.name, error = %e, "failed to remove agent from state"),
        }
    }

    async fn remove_orphaned_worktree_dirs(&self) {
        let valid: std::collections::HashSet<_> =
            self.state.get_all_repos().into_iter().flat_map(|r| r.agents.into_values().map(|a| a.worktree_path)).collect();

        let Ok(entries) = std::fs::read_dir(&self.worktrees_root) else { return };
        for entry in entries.flatten() {
            for agent_dir in std::fs::read_dir(entry.path()).into_iter().flatten().flatten() {
                let path = agent_dir.path();
                if !valid.contains(&path) {
                    debug!(path = %path.display(), "removing orphaned worktree directory");
                    let _ = std::fs::remove_dir_all(&path);
                }
            }
        }
    }

    async fn reap_branches(&self) {
        for repo in self.state.get_all_repos() {
            let main_path = repo.agents.values().find(|a| !a.kind.owns_dedicated_worktree()).map(|a| a.worktree_path.clone());
            let Some(main_path) = main_path else { continue };
            match self.worktree.find_orphaned_branches(&main_path, "").await {
                Ok(branches) => {
                    for branch in branches {
                        if let Err(e) = self.worktree.delete_branch(&main_path, &branch, false).await {
                            debug!(repo = %repo.name, branch, error = %e, "branch reap skipped");
                        } else {
                            info!(repo = %repo.name, branch, "reaped merged branch");
                        }
                    }
                }
                Err(e) => warn!(repo = %repo.name, error = %e, "failed to list orphaned branches"),
            }
        }
    }
}

#[cfg(test)]
#[path = "cleanup_tests.rs"]
mod tests;
