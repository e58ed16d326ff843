// SPDX-License-Identifier: MIT

//! Per-(repo, agent) inbox directories. Each message is a file named by its
//! id; the file is the single source of truth (§4.4).

use crate::error::{Result, StoreError};
use mc_core::{Clock, Message, MessageId};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct MessageStore {
    root: PathBuf,
    clock: Arc<dyn Clock>,
}

impl MessageStore {
    pub fn new(root: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self { root: root.into(), clock }
    }

    fn inbox_dir(&self, repo: &str, agent: &str) -> PathBuf {
        self.root.join(repo).join(agent)
    }

    fn message_path(&self, repo: &str, agent: &str, id: &MessageId) -> PathBuf {
        self.inbox_dir(repo, agent).join(format!("{}.json", id.as_str()))
    }

    /// Allocates an id, writes the file with status `pending` atomically.
    pub fn send(&self, repo: &str, from_agent: &str, to_agent: &str, body: &str) -> Result<Message> {
        let message = Message::new(repo, from_agent, to_agent, body, self.clock.now());
        self.write(repo, to_agent, &message)?;
        Ok(message)
    }

    /// Ordered by created-at ascending.
    pub fn list(&self, repo: &str, agent: &str) -> Result<Vec<Message>> {
        let dir = self.inbox_dir(repo, agent);
        let mut messages = Vec::new();
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::Io(e)),
        };
        for entry in entries {
            let entry = entry.map_err(StoreError::Io)?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let bytes = std::fs::read(&path)?;
            let message: Message = serde_json::from_slice(&bytes)?;
            messages.push(message);
        }
        messages.sort_by_key(|m| m.created_at);
        Ok(messages)
    }

    /// Transitions `delivered` -> `read`.
    pub fn read(&self, repo: &str, agent: &str, id: &str) -> Result<Message> {
        self.update(repo, agent, id, |m| m.mark_read(self.clock.now()))
    }

    /// Transitions `read` -> `acknowledged`.
    pub fn ack(&self, repo: &str, agent: &str, id: &str) -> Result<Message> {
        self.update(repo, agent, id, |m| m.mark_acknowledged(self.clock.now()))
    }

    pub fn mark_delivered(&self, repo: &str, agent: &str, id: &str) -> Result<Message> {
        self.update(repo, agent, id, |m| m.mark_delivered(self.clock.now()))
    }

    fn update(&self, repo: &str, agent: &str, id: &str, mutator: impl FnOnce(&mut Message)) -> Result<Message> {
        let path = self.inbox_dir(repo, agent).join(format!("{id}.json"));
        let bytes = std::fs::read(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => StoreError::MessageNotFound(id.to_string()),
            _ => StoreError::Io(e),
        })?;
        let mut message: Message = serde_json::from_slice(&bytes)?;
        mutator(&mut message);
        write_atomic(&path, &serde_json::to_vec_pretty(&message)?)?;
        Ok(message)
    }

    fn write(&self, repo: &str, agent: &str, message: &Message) -> Result<()> {
        let dir = self.inbox_dir(repo, agent);
        std::fs::create_dir_all(&dir)?;
        let path = self.message_path(repo, agent, &message.id);
        write_atomic(&path, &serde_json::to_vec_pretty(message)?)
    }

    /// Removes inbox directories for agents not present in `valid_agents`.
    pub fn cleanup_orphaned(&self, repo: &str, valid_agents: &HashSet<String>) -> Result<()> {
        let repo_dir = self.root.join(repo);
        let entries = match std::fs::read_dir(&repo_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(StoreError::Io(e)),
        };
        for entry in entries {
            let entry = entry.map_err(StoreError::Io)?;
            if !entry.file_type().map_err(StoreError::Io)?.is_dir() {
                continue;
            }
            let agent_name = entry.file_name().to_string_lossy().into_owned();
            if !valid_agents.contains(&agent_name) {
                std::fs::remove_dir_all(entry.path())?;
            }
        }
        Ok(())
    }

    /// Deletes the entire message subtree for a repository.
    pub fn remove_repo(&self, repo: &str) -> Result<()> {
        let dir = self.root.join(repo);
        match std::fs::remove_dir_all(&dir) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io(e)),
        }
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

#[cfg(test)]
#[path = "message_store_tests.rs"]
mod tests;
