// SPDX-License-Identifier: MIT

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WireError {
    #[error("missing required argument: {0}")]
    MissingArg(String),

    #[error("argument {0} must be a non-empty string")]
    InvalidArg(String),

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("malformed request: {0}")]
    Malformed(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<WireError> for mc_core::Error {
    fn from(e: WireError) -> Self {
        mc_core::Error::invalid_argument(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, WireError>;
