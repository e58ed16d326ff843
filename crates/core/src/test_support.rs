// SPDX-License-Identifier: MIT

//! Test builders shared by the other crates' test suites.

use crate::agent::{Agent, AgentKind};
use crate::event::{Event, EventType};
use crate::repo::Repository;
use chrono::Utc;
use std::path::PathBuf;

/// Build a worker agent with sane test defaults, overridable via the builder methods.
pub struct AgentBuilder {
    agent: Agent,
}

impl AgentBuilder {
    pub fn worker(name: &str) -> Self {
        Self {
            agent: Agent::new(
                name,
                AgentKind::Worker,
                PathBuf::from(format!("/wts/r/{name}")),
                name,
                "task",
                Utc::now(),
            ),
        }
    }

    pub fn kind(mut self, kind: AgentKind) -> Self {
        self.agent.kind = kind;
        self
    }

    pub fn task(mut self, task: &str) -> Self {
        self.agent.task = task.to_string();
        self
    }

    pub fn ready_for_cleanup(mut self) -> Self {
        self.agent.ready_for_cleanup = true;
        self
    }

    pub fn build(self) -> Agent {
        self.agent
    }
}

/// Build a repository with no agents, for tests that add their own.
pub fn test_repo(name: &str) -> Repository {
    Repository::new(name, "https://example.invalid/org/repo.git", format!("mc-{name}"))
}

/// Build a minimal event of the given type for notification-path tests.
pub fn test_event(repo: &str, event_type: EventType) -> Event {
    Event::new(repo, event_type, "title", "message")
}
