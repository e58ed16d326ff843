// SPDX-License-Identifier: MIT

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("adapter {0} send failed: {1}")]
    SendFailed(String, String),

    #[error("adapter {0} timed out")]
    Timeout(String),

    #[error("pending reply not found: {0}")]
    PendingNotFound(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Aggregates the per-adapter failures from a single `Notify` call.
#[derive(Debug, Default)]
pub struct CompositeError {
    pub failures: Vec<NotifyError>,
}

impl CompositeError {
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }
}

impl std::fmt::Display for CompositeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let joined = self.failures.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; ");
        write!(f, "{} adapter failure(s): {joined}", self.failures.len())
    }
}

impl std::error::Error for CompositeError {}

impl From<NotifyError> for mc_core::Error {
    fn from(e: NotifyError) -> Self {
        match &e {
            NotifyError::PendingNotFound(_) => mc_core::Error::not_found(e.to_string()),
            NotifyError::Config(_) => mc_core::Error::invalid_argument(e.to_string()),
            NotifyError::Timeout(_) | NotifyError::Http(_) => mc_core::Error::transient(e.to_string()),
            NotifyError::SendFailed(_, _) => mc_core::Error::transient(e.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, NotifyError>;
