// SPDX-License-Identifier: MIT

//! Slack incoming-webhook adapter, formatting events as a text + section
//! block payload (§4.7).

use super::post_with_retry;
use crate::adapter::NotifyAdapter;
use crate::config::{ChannelConfig, ChannelType};
use crate::error::{NotifyError, Result};
use async_trait::async_trait;
use mc_core::Event;
use serde_json::json;

const MAX_RETRIES: u32 = 3;

pub struct SlackAdapter {
    name: String,
    webhook_url: String,
    channel: Option<String>,
    client: reqwest::Client,
}

impl SlackAdapter {
    pub fn new(config: &ChannelConfig) -> Result<Self> {
        let webhook_url = config
            .webhook_url
            .clone()
            .ok_or_else(|| NotifyError::Config(format!("channel {}: missing webhook_url", config.name)))?;
        Ok(Self { name: config.name.clone(), webhook_url, channel: config.channel.clone(), client: reqwest::Client::new() })
    }
}

#[async_trait]
impl NotifyAdapter for SlackAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn channel_type(&self) -> ChannelType {
        ChannelType::Slack
    }

    async fn send(&self, event: &Event) -> Result<()> {
        let text = format!("*{}*\n{}", event.title, event.message);
        let mut payload = json!({
            "text": text,
            "blocks": [{
                "type": "section",
                "text": { "type": "mrkdwn", "text": text },
            }],
        });
        if let Some(channel) = &self.channel {
            payload["channel"] = json!(channel);
        }

        post_with_retry(&self.client, &self.name, &self.webhook_url, &[], &payload, MAX_RETRIES).await
    }
}

#[cfg(test)]
#[path = "slack_tests.rs"]
mod tests;
