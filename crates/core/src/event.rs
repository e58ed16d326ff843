// SPDX-License-Identifier: MIT

//! Notification events (§3, §6.2).

use crate::define_id;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

define_id! {
    /// Globally unique notification event identifier.
    pub struct EventId("evt_");
}

define_id! {
    /// Identifier handed out for an event awaiting a user reply.
    pub struct ReplyId("rpl_");
}

/// The kind of thing a notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    AgentQuestion,
    AgentCompleted,
    AgentStuck,
    AgentError,
    PrCreated,
    PrMerged,
    CiFailed,
    StatusUpdate,
}

impl EventType {
    /// Default priority for this event type, applied when the caller leaves
    /// `priority` unset (§4.6 step 1).
    pub fn default_priority(self) -> Priority {
        match self {
            EventType::AgentQuestion => Priority::High,
            EventType::AgentStuck => Priority::High,
            EventType::AgentError => Priority::High,
            EventType::CiFailed => Priority::Medium,
            EventType::PrCreated => Priority::Medium,
            EventType::PrMerged => Priority::Medium,
            EventType::AgentCompleted => Priority::Low,
            EventType::StatusUpdate => Priority::Low,
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EventType::AgentQuestion => "agent.question",
            EventType::AgentCompleted => "agent.completed",
            EventType::AgentStuck => "agent.stuck",
            EventType::AgentError => "agent.error",
            EventType::PrCreated => "pr.created",
            EventType::PrMerged => "pr.merged",
            EventType::CiFailed => "ci.failed",
            EventType::StatusUpdate => "status.update",
        };
        write!(f, "{s}")
    }
}

/// Notification priority. Ordered `Low < Medium < High` (§4.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// A notification event, fanned out by the hub to every registered adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub priority: Priority,
    pub timestamp: DateTime<Utc>,
    pub repo_name: String,
    pub agent_name: Option<String>,
    pub agent_type: Option<String>,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub context: HashMap<String, String>,
    pub action_required: bool,
    pub response_id: Option<ReplyId>,
}

impl Event {
    /// Construct an event with defaults applied for id/timestamp/priority,
    /// the way [`crate::hub`]-equivalent callers in `mc-notify` expect (§4.6
    /// step 1): id assigned if empty, timestamp set to `now` if unset,
    /// priority defaulted per type if unset.
    pub fn new(repo_name: impl Into<String>, event_type: EventType, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: EventId::new(),
            priority: event_type.default_priority(),
            event_type,
            timestamp: Utc::now(),
            repo_name: repo_name.into(),
            agent_name: None,
            agent_type: None,
            title: title.into(),
            message: message.into(),
            context: HashMap::new(),
            action_required: false,
            response_id: None,
        }
    }

    /// Deterministic fingerprint for deduplication: `type|repo|agent|title` (§3).
    pub fn fingerprint(&self) -> String {
        format!(
            "{}|{}|{}|{}",
            self.event_type,
            self.repo_name,
            self.agent_name.as_deref().unwrap_or(""),
            self.title
        )
    }
}

/// A response delivered back through an interactive adapter's callback (§4.6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub event_id: Option<EventId>,
    pub response_id: ReplyId,
    pub message: Option<String>,
    pub action: Option<String>,
    pub source: String,
    pub user_id: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
