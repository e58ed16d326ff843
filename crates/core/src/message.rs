// SPDX-License-Identifier: MIT

//! Inter-agent messages (§3, §4.4).

use crate::define_id;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

define_id! {
    /// Globally unique message identifier.
    pub struct MessageId("msg_");
}

/// Lifecycle status of a message (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageStatus {
    Pending,
    Delivered,
    Read,
    Acknowledged,
}

impl MessageStatus {
    /// The next status in the lifecycle, or `None` if already terminal.
    ///
    /// Replaying an earlier transition on an already-advanced message is a
    /// no-op (§8): callers should only apply `next()` when it actually moves
    /// the status forward from the one they expected.
    fn next(self) -> Option<Self> {
        match self {
            MessageStatus::Pending => Some(MessageStatus::Delivered),
            MessageStatus::Delivered => Some(MessageStatus::Read),
            MessageStatus::Read => Some(MessageStatus::Acknowledged),
            MessageStatus::Acknowledged => None,
        }
    }
}

/// A message in a recipient's inbox.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub repo: String,
    pub from_agent: String,
    pub to_agent: String,
    pub body: String,
    pub status: MessageStatus,
    pub created_at: DateTime<Utc>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub read_at: Option<DateTime<Utc>>,
    pub acknowledged_at: Option<DateTime<Utc>>,
}

impl Message {
    pub fn new(
        repo: impl Into<String>,
        from_agent: impl Into<String>,
        to_agent: impl Into<String>,
        body: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: MessageId::new(),
            repo: repo.into(),
            from_agent: from_agent.into(),
            to_agent: to_agent.into(),
            body: body.into(),
            status: MessageStatus::Pending,
            created_at: now,
            delivered_at: None,
            read_at: None,
            acknowledged_at: None,
        }
    }

    /// Idempotently move `pending` -> `delivered`. No-op if already past pending.
    pub fn mark_delivered(&mut self, now: DateTime<Utc>) {
        if self.status == MessageStatus::Pending {
            self.status = MessageStatus::Delivered;
            self.delivered_at = Some(now);
        }
    }

    /// Idempotently move `delivered` -> `read`. No-op otherwise.
    pub fn mark_read(&mut self, now: DateTime<Utc>) {
        if self.status == MessageStatus::Delivered {
            self.status = MessageStatus::Read;
            self.read_at = Some(now);
        }
    }

    /// Idempotently move `read` -> `acknowledged`. No-op otherwise.
    pub fn mark_acknowledged(&mut self, now: DateTime<Utc>) {
        if self.status == MessageStatus::Read {
            self.status = MessageStatus::Acknowledged;
            self.acknowledged_at = Some(now);
        }
    }

    /// `true` once every lifecycle transition has been applied.
    pub fn is_terminal(&self) -> bool {
        self.status.next().is_none()
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
