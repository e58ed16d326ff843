// SPDX-License-Identifier: MIT

//! Task-history entries recorded when a worker is removed (§4.9).

use crate::agent::Agent;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Derived status of a completed worker, recorded at removal time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskHistoryStatus {
    Failed,
    Unknown,
}

/// A single worker's life, captured for the task-history log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskHistoryEntry {
    pub name: String,
    pub task: String,
    pub summary: Option<String>,
    pub status: TaskHistoryStatus,
    pub failure_reason: Option<String>,
    pub branch: Option<String>,
    pub created_at: DateTime<Utc>,
    pub removed_at: DateTime<Utc>,
}

impl TaskHistoryEntry {
    /// Status is derived from whether a failure reason was recorded (§4.9).
    pub fn derive_status(failure_reason: &Option<String>) -> TaskHistoryStatus {
        if failure_reason.is_some() {
            TaskHistoryStatus::Failed
        } else {
            TaskHistoryStatus::Unknown
        }
    }

    /// Builds a history entry for a worker being removed, inferring the
    /// branch from the worktree's directory name (§4.9).
    pub fn from_removed_agent(agent: &Agent, removed_at: DateTime<Utc>) -> Self {
        let branch = agent.worktree_path.file_name().map(|n| n.to_string_lossy().into_owned());
        Self {
            name: agent.name.clone(),
            task: agent.task.clone(),
            summary: agent.completion_summary.clone(),
            status: Self::derive_status(&agent.failure_reason),
            failure_reason: agent.failure_reason.clone(),
            branch,
            created_at: agent.created_at,
            removed_at,
        }
    }
}

#[cfg(test)]
#[path = "task_history_tests.rs"]
mod tests;
