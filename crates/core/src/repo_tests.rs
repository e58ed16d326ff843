// SPDX-License-Identifier: MIT

use super::*;
use crate::agent::{Agent, AgentKind};
use crate::task_history::{TaskHistoryEntry, TaskHistoryStatus};
use chrono::Utc;
use std::path::PathBuf;

fn entry(name: &str) -> TaskHistoryEntry {
    let now = Utc::now();
    TaskHistoryEntry {
        name: name.to_string(),
        task: "fix".to_string(),
        summary: None,
        status: TaskHistoryStatus::Unknown,
        failure_reason: None,
        branch: None,
        created_at: now,
        removed_at: now,
    }
}

#[test]
fn push_history_evicts_oldest_past_the_limit() {
    let mut repo = Repository::new("r", "origin", "mc-r");
    for i in 0..(TASK_HISTORY_LIMIT + 5) {
        repo.push_history(entry(&format!("w{i}")));
    }
    assert_eq!(repo.task_history.len(), TASK_HISTORY_LIMIT);
    assert_eq!(repo.task_history.front().unwrap().name, "w5");
}

#[test]
fn worktree_in_use_detects_shared_paths() {
    let mut repo = Repository::new("r", "origin", "mc-r");
    let path = PathBuf::from("/wts/r/w");
    repo.agents.insert(
        "w".to_string(),
        Agent::new("w", AgentKind::Worker, path.clone(), "w", "fix", Utc::now()),
    );
    assert!(repo.worktree_in_use(&path));
    assert!(!repo.worktree_in_use(&PathBuf::from("/wts/r/other")));
}
