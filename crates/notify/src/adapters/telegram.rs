// SPDX-License-Identifier: MIT

//! Telegram bot adapter, calling the Bot API's `sendMessage` method (§4.7).

use super::post_with_retry;
use crate::adapter::NotifyAdapter;
use crate::config::{ChannelConfig, ChannelType};
use crate::error::{NotifyError, Result};
use async_trait::async_trait;
use mc_core::Event;
use serde_json::json;

const MAX_RETRIES: u32 = 3;

pub struct TelegramAdapter {
    name: String,
    bot_token: String,
    chat_id: String,
    client: reqwest::Client,
}

impl TelegramAdapter {
    pub fn new(config: &ChannelConfig) -> Result<Self> {
        let bot_token = config
            .bot_token
            .clone()
            .ok_or_else(|| NotifyError::Config(format!("channel {}: missing bot_token", config.name)))?;
        let chat_id = config
            .chat_id
            .clone()
            .ok_or_else(|| NotifyError::Config(format!("channel {}: missing chat_id", config.name)))?;
        Ok(Self { name: config.name.clone(), bot_token, chat_id, client: reqwest::Client::new() })
    }

    fn url(&self) -> String {
        format!("https://api.telegram.org/bot{}/sendMessage", self.bot_token)
    }
}

#[async_trait]
impl NotifyAdapter for TelegramAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn channel_type(&self) -> ChannelType {
        ChannelType::Telegram
    }

    async fn send(&self, event: &Event) -> Result<()> {
        let text = format!("{}\n{}", event.title, event.message);
        let payload = json!({ "chat_id": self.chat_id, "text": text });
        post_with_retry(&self.client, &self.name, &self.url(), &[], &payload, MAX_RETRIES).await
    }
}

#[cfg(test)]
#[path = "telegram_tests.rs"]
mod tests;
