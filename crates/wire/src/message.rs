// SPDX-License-Identifier: MIT

//! Request/response envelopes for the control socket (§6.1).

use crate::error::{Result, WireError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    pub command: String,
    #[serde(default)]
    pub args: Map<String, Value>,
}

impl Request {
    pub fn new(command: impl Into<String>) -> Self {
        Self { command: command.into(), args: Map::new() }
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.args.insert(key.into(), value.into());
        self
    }

    /// Requires `key` to be present and a non-empty string.
    pub fn require_str(&self, key: &str) -> Result<&str> {
        let value = self.args.get(key).ok_or_else(|| WireError::MissingArg(key.to_string()))?;
        match value.as_str() {
            Some(s) if !s.is_empty() => Ok(s),
            _ => Err(WireError::InvalidArg(key.to_string())),
        }
    }

    /// Like [`Self::require_str`] but returns `None` when the key is simply absent.
    pub fn optional_str(&self, key: &str) -> Result<Option<&str>> {
        match self.args.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => match value.as_str() {
                Some(s) if !s.is_empty() => Ok(Some(s)),
                _ => Err(WireError::InvalidArg(key.to_string())),
            },
        }
    }

    pub fn optional_bool(&self, key: &str, default: bool) -> bool {
        self.args.get(key).and_then(Value::as_bool).unwrap_or(default)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    pub fn ok(data: impl Serialize) -> Self {
        Self { success: true, data: serde_json::to_value(data).ok(), error: None }
    }

    pub fn ok_empty() -> Self {
        Self { success: true, data: None, error: None }
    }

    pub fn err(message: impl std::fmt::Display) -> Self {
        Self { success: false, data: None, error: Some(message.to_string()) }
    }
}

impl From<mc_core::Error> for Response {
    fn from(e: mc_core::Error) -> Self {
        Response::err(e)
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
