// SPDX-License-Identifier: MIT

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("repository not found: {0}")]
    RepoNotFound(String),

    #[error("repository already exists: {0}")]
    RepoAlreadyExists(String),

    #[error("agent not found: {0}/{1}")]
    AgentNotFound(String, String),

    #[error("agent already exists: {0}/{1}")]
    AgentAlreadyExists(String, String),

    #[error("message not found: {0}")]
    MessageNotFound(String),

    #[error("invalid state: {0}")]
    Invalid(String),

    #[error("persisted state is corrupt: {0}")]
    Corrupt(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl From<StoreError> for mc_core::Error {
    fn from(e: StoreError) -> Self {
        match &e {
            StoreError::RepoNotFound(_) | StoreError::AgentNotFound(_, _) | StoreError::MessageNotFound(_) => {
                mc_core::Error::not_found(e.to_string())
            }
            StoreError::RepoAlreadyExists(_) | StoreError::AgentAlreadyExists(_, _) => {
                mc_core::Error::already_exists(e.to_string())
            }
            StoreError::Invalid(_) => mc_core::Error::invalid_argument(e.to_string()),
            StoreError::Corrupt(_) => mc_core::Error::fatal(e.to_string()),
            StoreError::Io(_) | StoreError::Serde(_) => mc_core::Error::transient(e.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
