// SPDX-License-Identifier: MIT

//! Notification configuration (§6.6), loaded from TOML with environment
//! variable interpolation applied to scalar string fields.

use crate::error::{NotifyError, Result};
use mc_core::{EventType, Priority};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelType {
    Webhook,
    Slack,
    Telegram,
    Discord,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChannelConfig {
    #[serde(rename = "type")]
    pub channel_type: ChannelType,
    pub name: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    pub url: Option<String>,
    pub webhook_url: Option<String>,
    pub bot_token: Option<String>,
    pub chat_id: Option<String>,
    pub channel: Option<String>,
    pub signing_secret: Option<String>,
    pub listen_addr: Option<String>,
    pub response_url: Option<String>,
    pub response_path: Option<String>,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    pub secret: Option<String>,
}

impl Default for ChannelType {
    fn default() -> Self {
        ChannelType::Webhook
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventRule {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub channels: Vec<String>,
    pub delay_minutes: Option<u32>,
    pub min_priority: Option<Priority>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuietHoursConfig {
    #[serde(default)]
    pub enabled: bool,
    /// "HH:MM" in `timezone`.
    pub start: String,
    /// "HH:MM" in `timezone`.
    pub end: String,
    /// A fixed UTC offset such as "+00:00" or "-05:00".
    pub timezone: String,
}

impl Default for QuietHoursConfig {
    fn default() -> Self {
        Self { enabled: false, start: "22:00".to_string(), end: "08:00".to_string(), timezone: "+00:00".to_string() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    pub max_per_minute: u32,
    pub cooldown_after_burst_seconds: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self { max_per_minute: 20, cooldown_after_burst_seconds: 60 }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub enabled: bool,
    pub listen_addr: Option<String>,
    pub auth_token: Option<String>,
    pub cors_origins: Option<Vec<String>>,
    #[serde(default = "default_true")]
    pub enable_sse: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub channels: Vec<ChannelConfig>,
    #[serde(default)]
    pub events: HashMap<EventType, EventRule>,
    #[serde(default)]
    pub quiet_hours: QuietHoursConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

fn default_true() -> bool {
    true
}

impl NotificationConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let interpolated = interpolate_env(raw);
        toml::from_str(&interpolated).map_err(|e| NotifyError::Config(e.to_string()))
    }

    /// Unique channel names, required per-type fields, event references to
    /// existing channels.
    pub fn validate(&self) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        for channel in &self.channels {
            if !seen.insert(&channel.name) {
                return Err(NotifyError::Config(format!("duplicate channel name: {}", channel.name)));
            }
            validate_channel(channel)?;
        }
        for (event_type, rule) in &self.events {
            for channel_name in &rule.channels {
                if !self.channels.iter().any(|c| &c.name == channel_name) {
                    return Err(NotifyError::Config(format!(
                        "event {event_type} references unknown channel {channel_name}"
                    )));
                }
            }
        }
        Ok(())
    }
}

fn validate_channel(channel: &ChannelConfig) -> Result<()> {
    let missing = |field: &str| NotifyError::Config(format!("channel {}: missing {field}", channel.name));
    match channel.channel_type {
        ChannelType::Webhook => {
            if channel.url.is_none() && channel.webhook_url.is_none() {
                return Err(missing("url or webhook_url"));
            }
        }
        ChannelType::Slack => {
            if channel.webhook_url.is_none() {
                return Err(missing("webhook_url"));
            }
        }
        ChannelType::Telegram => {
            if channel.bot_token.is_none() {
                return Err(missing("bot_token"));
            }
            if channel.chat_id.is_none() {
                return Err(missing("chat_id"));
            }
        }
        ChannelType::Discord => {
            if channel.webhook_url.is_none() {
                return Err(missing("webhook_url"));
            }
        }
    }
    Ok(())
}

/// Expands `${VAR}`, `${VAR:-default}`, and `$VAR` in scalar string values.
/// Operates on the raw text before TOML parsing, which is adequate because
/// interpolation only ever targets bare scalars, never structural syntax.
fn interpolate_env(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.char_indices().peekable();
    while let Some((_, c)) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some(&(_, '{')) => {
                chars.next();
                let mut spec = String::new();
                for (_, c) in chars.by_ref() {
                    if c == '}' {
                        break;
                    }
                    spec.push(c);
                }
                out.push_str(&resolve_braced(&spec));
            }
            Some(&(_, next)) if next.is_ascii_alphabetic() || next == '_' => {
                let mut name = String::new();
                while let Some(&(_, c)) = chars.peek() {
                    if c.is_ascii_alphanumeric() || c == '_' {
                        name.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                out.push_str(&std::env::var(&name).unwrap_or_default());
            }
            _ => out.push('$'),
        }
    }
    out
}

fn resolve_braced(spec: &str) -> String {
    match spec.split_once(":-") {
        Some((name, default)) => std::env::var(name).unwrap_or_else(|_| default.to_string()),
        None => std::env::var(spec).unwrap_or_default(),
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
