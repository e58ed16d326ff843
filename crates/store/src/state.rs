// SPDX-License-Identifier: MIT

//! In-memory repo→agents graph behind a single reader-writer lock, persisted
//! whole-file with write-then-rename onto a configured path.

use crate::error::{Result, StoreError};
use mc_core::{Agent, Clock, Repository, TaskHistoryEntry};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::warn;

#[derive(Debug, Default, Serialize, Deserialize)]
struct Graph {
    #[serde(default)]
    repos: HashMap<String, Repository>,
}

/// Owns the Repository graph exclusively; every mutation goes through here so
/// invariants (agent uniqueness, worktree ownership) are checked in one place.
pub struct StateStore {
    path: PathBuf,
    graph: RwLock<Graph>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for StateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateStore").field("path", &self.path).field("graph", &self.graph).finish()
    }
}

impl StateStore {
    /// Loads from `path` if present. A missing file yields an empty graph; a
    /// malformed or truncated one fails loudly rather than silently dropping
    /// state (§4.1 load-time policy).
    pub fn load(path: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Result<Self> {
        let path = path.into();
        let graph = match std::fs::read(&path) {
            Ok(bytes) if bytes.is_empty() => Graph::default(),
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| StoreError::Corrupt(format!("{}: {e}", path.display())))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Graph::default(),
            Err(e) => return Err(StoreError::Io(e)),
        };
        Ok(Self { path, graph: RwLock::new(graph), clock })
    }

    pub fn add_repo(&self, repo: Repository) -> Result<()> {
        {
            let mut graph = self.graph.write();
            if graph.repos.contains_key(&repo.name) {
                return Err(StoreError::RepoAlreadyExists(repo.name));
            }
            graph.repos.insert(repo.name.clone(), repo);
        }
        self.save()
    }

    pub fn remove_repo(&self, name: &str) -> Result<Repository> {
        let removed = {
            let mut graph = self.graph.write();
            graph.repos.remove(name).ok_or_else(|| StoreError::RepoNotFound(name.to_string()))?
        };
        self.save()?;
        Ok(removed)
    }

    pub fn add_agent(&self, repo: &str, agent: Agent) -> Result<()> {
        {
            let mut graph = self.graph.write();
            let repository = graph.repos.get_mut(repo).ok_or_else(|| StoreError::RepoNotFound(repo.to_string()))?;
            if repository.agents.contains_key(&agent.name) {
                return Err(StoreError::AgentAlreadyExists(repo.to_string(), agent.name));
            }
            if agent.kind.owns_dedicated_worktree() && repository.worktree_in_use(&agent.worktree_path) {
                return Err(StoreError::Invalid(format!(
                    "worktree {} already owned by another agent",
                    agent.worktree_path.display()
                )));
            }
            repository.agents.insert(agent.name.clone(), agent);
        }
        self.save()
    }

    /// Copy-modify-replace under the write lock.
    pub fn update_agent(&self, repo: &str, name: &str, mutator: impl FnOnce(&mut Agent)) -> Result<Agent> {
        let updated = {
            let mut graph = self.graph.write();
            let repository = graph.repos.get_mut(repo).ok_or_else(|| StoreError::RepoNotFound(repo.to_string()))?;
            let agent = repository
                .agents
                .get_mut(name)
                .ok_or_else(|| StoreError::AgentNotFound(repo.to_string(), name.to_string()))?;
            mutator(agent);
            agent.clone()
        };
        self.save()?;
        Ok(updated)
    }

    /// Records a task-history entry before deletion when the agent is a worker (§4.9).
    pub fn remove_agent(&self, repo: &str, name: &str) -> Result<Agent> {
        let removed = {
            let mut graph = self.graph.write();
            let repository = graph.repos.get_mut(repo).ok_or_else(|| StoreError::RepoNotFound(repo.to_string()))?;
            let agent = repository
                .agents
                .remove(name)
                .ok_or_else(|| StoreError::AgentNotFound(repo.to_string(), name.to_string()))?;
            if agent.kind == mc_core::AgentKind::Worker {
                repository.push_history(TaskHistoryEntry::from_removed_agent(&agent, self.clock.now()));
            }
            agent
        };
        self.save()?;
        Ok(removed)
    }

    pub fn get_repo(&self, name: &str) -> Result<Repository> {
        self.graph.read().repos.get(name).cloned().ok_or_else(|| StoreError::RepoNotFound(name.to_string()))
    }

    pub fn get_agent(&self, repo: &str, name: &str) -> Result<Agent> {
        let graph = self.graph.read();
        let repository = graph.repos.get(repo).ok_or_else(|| StoreError::RepoNotFound(repo.to_string()))?;
        repository.agents.get(name).cloned().ok_or_else(|| StoreError::AgentNotFound(repo.to_string(), name.to_string()))
    }

    pub fn list_repos(&self) -> Vec<String> {
        self.graph.read().repos.keys().cloned().collect()
    }

    pub fn get_all_repos(&self) -> Vec<Repository> {
        self.graph.read().repos.values().cloned().collect()
    }

    pub fn get_task_history(&self, repo: &str, limit: usize) -> Result<Vec<TaskHistoryEntry>> {
        let graph = self.graph.read();
        let repository = graph.repos.get(repo).ok_or_else(|| StoreError::RepoNotFound(repo.to_string()))?;
        Ok(repository.task_history.iter().rev().take(limit).cloned().collect())
    }

    /// Whole-file write-then-rename: readers never observe a partial write.
    pub fn save(&self) -> Result<()> {
        let graph = self.graph.read();
        let json = serde_json::to_string_pretty(&*graph)?;
        write_atomic(&self.path, json.as_bytes())
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let tmp_path = path.with_extension("tmp");
    std::fs::write(&tmp_path, bytes)?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

impl Drop for StateStore {
    fn drop(&mut self) {
        if let Err(e) = self.save() {
            warn!(error = %e, path = %self.path.display(), "failed to persist state store on drop");
        }
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
