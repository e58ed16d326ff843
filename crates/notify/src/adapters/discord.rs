// SPDX-License-Identifier: MIT

//! Discord webhook adapter, formatting events as a single embed (§4.7).

use super::post_with_retry;
use crate::adapter::NotifyAdapter;
use crate::config::{ChannelConfig, ChannelType};
use crate::error::{NotifyError, Result};
use async_trait::async_trait;
use mc_core::{Event, Priority};
use serde_json::json;

const MAX_RETRIES: u32 = 3;

pub struct DiscordAdapter {
    name: String,
    webhook_url: String,
    client: reqwest::Client,
}

impl DiscordAdapter {
    pub fn new(config: &ChannelConfig) -> Result<Self> {
        let webhook_url = config
            .webhook_url
            .clone()
            .ok_or_else(|| NotifyError::Config(format!("channel {}: missing webhook_url", config.name)))?;
        Ok(Self { name: config.name.clone(), webhook_url, client: reqwest::Client::new() })
    }
}

fn color_for(priority: Priority) -> u32 {
    match priority {
        Priority::Low => 0x95a5a6,
        Priority::Medium => 0xf1c40f,
        Priority::High => 0xe74c3c,
    }
}

#[async_trait]
impl NotifyAdapter for DiscordAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn channel_type(&self) -> ChannelType {
        ChannelType::Discord
    }

    async fn send(&self, event: &Event) -> Result<()> {
        let payload = json!({
            "embeds": [{
                "title": event.title,
                "description": event.message,
                "color": color_for(event.priority),
            }],
        });
        post_with_retry(&self.client, &self.name, &self.webhook_url, &[], &payload, MAX_RETRIES).await
    }
}

#[cfg(test)]
#[path = "discord_tests.rs"]
mod tests;
