// SPDX-License-Identifier: MIT

//! mc-notify: the notification hub, its adapters, and the HTTP API (§4.6-§4.8).

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod adapter;
mod adapters;
mod config;
mod dedup;
mod error;
mod filter;
mod hmac;
mod http_api;
mod hub;
mod pending;
mod quiet_hours;
mod rate_limit;

#[cfg(any(test, feature = "test-support"))]
pub mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeInteractiveAdapter, FakeNotifyAdapter};

pub use adapter::{InteractiveAdapter, NotifyAdapter, ResponseHandler};
pub use adapters::{DiscordAdapter, SlackAdapter, TelegramAdapter, WebhookAdapter};
pub use config::{ApiConfig, ChannelConfig, ChannelType, EventRule, NotificationConfig, QuietHoursConfig, RateLimitConfig};
pub use error::{CompositeError, NotifyError, Result};
pub use filter::Filter;
pub use http_api::{new_state, publish, serve_http_api, ApiHandle, StatusProvider, StatusReport};
pub use hub::{AdapterRegistration, NotificationHub};

/// Builds the built-in adapter for a single channel configuration.
pub fn build_adapter(channel: &ChannelConfig) -> Result<std::sync::Arc<dyn NotifyAdapter>> {
    use std::sync::Arc;
    Ok(match channel.channel_type {
        ChannelType::Webhook => Arc::new(WebhookAdapter::new(channel)?) as Arc<dyn NotifyAdapter>,
        ChannelType::Slack => Arc::new(SlackAdapter::new(channel)?) as Arc<dyn NotifyAdapter>,
        ChannelType::Telegram => Arc::new(TelegramAdapter::new(channel)?) as Arc<dyn NotifyAdapter>,
        ChannelType::Discord => Arc::new(DiscordAdapter::new(channel)?) as Arc<dyn NotifyAdapter>,
    })
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
