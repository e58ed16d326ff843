// SPDX-License-Identifier: MIT

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MultiplexerError {
    #[error("session not found: {0}")]
    SessionNotFound(String),

    #[error("window not found: {0}/{1}")]
    WindowNotFound(String, String),

    #[error("command failed: {0}")]
    Command(String),

    #[error("operation cancelled")]
    Cancelled,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<MultiplexerError> for mc_core::Error {
    fn from(e: MultiplexerError) -> Self {
        match &e {
            MultiplexerError::SessionNotFound(_) => mc_core::Error::not_found(e.to_string()),
            MultiplexerError::WindowNotFound(_, _) => mc_core::Error::not_found(e.to_string()),
            MultiplexerError::Cancelled => mc_core::Error::cancelled(e.to_string()),
            MultiplexerError::Command(_) | MultiplexerError::Io(_) => mc_core::Error::transient(e.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, MultiplexerError>;
