// SPDX-License-Identifier: MIT

//! Agent identity and record types (§3).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The role an agent plays within its repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    Supervisor,
    MergeQueue,
    Worker,
    Workspace,
    Review,
}

impl AgentKind {
    /// Supervisor and merge-queue agents share the repo's main worktree (§3b/c);
    /// worker and workspace agents each own a worktree under the worktrees root.
    pub fn owns_dedicated_worktree(self) -> bool {
        matches!(self, AgentKind::Worker | AgentKind::Workspace)
    }
}

impl std::fmt::Display for AgentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AgentKind::Supervisor => "supervisor",
            AgentKind::MergeQueue => "merge_queue",
            AgentKind::Worker => "worker",
            AgentKind::Workspace => "workspace",
            AgentKind::Review => "review",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for AgentKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "supervisor" => Ok(AgentKind::Supervisor),
            "merge_queue" => Ok(AgentKind::MergeQueue),
            "worker" => Ok(AgentKind::Worker),
            "workspace" => Ok(AgentKind::Workspace),
            "review" => Ok(AgentKind::Review),
            other => Err(crate::Error::invalid_argument(format!("unknown agent type: {other}"))),
        }
    }
}

/// A single tracked agent within a repository.
///
/// `name` is unique within its repository (enforced by the state store, not
/// here). `ready_for_cleanup = true` implies no further mutation except
/// removal (§3d) — enforced by [`crate::Error::conflict`] at the call site
/// that would otherwise mutate it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub name: String,
    pub kind: AgentKind,
    pub worktree_path: PathBuf,
    pub tmux_window: String,
    pub task: String,
    pub completion_summary: Option<String>,
    pub failure_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
    pub ready_for_cleanup: bool,
    /// Adapter-opaque process identifier of the pane shell (e.g. a PID).
    pub pane_pid: Option<i32>,
}

impl Agent {
    pub fn new(
        name: impl Into<String>,
        kind: AgentKind,
        worktree_path: PathBuf,
        tmux_window: impl Into<String>,
        task: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            worktree_path,
            tmux_window: tmux_window.into(),
            task: task.into(),
            completion_summary: None,
            failure_reason: None,
            created_at: now,
            last_activity_at: now,
            ready_for_cleanup: false,
            pane_pid: None,
        }
    }

    /// Whether this agent may still be mutated (§3d).
    pub fn is_mutable(&self) -> bool {
        !self.ready_for_cleanup
    }
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod tests;
