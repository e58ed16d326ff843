// SPDX-License-Identifier: MIT

//! Generic JSON webhook adapter, optionally HMAC-signing the body (§4.7).

use super::post_with_retry;
use crate::adapter::NotifyAdapter;
use crate::config::{ChannelConfig, ChannelType};
use crate::error::{NotifyError, Result};
use crate::hmac;
use async_trait::async_trait;
use mc_core::Event;

const MAX_RETRIES: u32 = 3;

pub struct WebhookAdapter {
    name: String,
    url: String,
    signing_secret: Option<String>,
    headers: Vec<(String, String)>,
    client: reqwest::Client,
}

impl WebhookAdapter {
    pub fn new(config: &ChannelConfig) -> Result<Self> {
        let url = config
            .url
            .clone()
            .or_else(|| config.webhook_url.clone())
            .ok_or_else(|| NotifyError::Config(format!("channel {}: missing url", config.name)))?;
        Ok(Self {
            name: config.name.clone(),
            url,
            signing_secret: config.signing_secret.clone().or_else(|| config.secret.clone()),
            headers: config.headers.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
            client: reqwest::Client::new(),
        })
    }
}

#[async_trait]
impl NotifyAdapter for WebhookAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn channel_type(&self) -> ChannelType {
        ChannelType::Webhook
    }

    async fn send(&self, event: &Event) -> Result<()> {
        let mut envelope = serde_json::json!({
            "version": "1.0",
            "event": event,
            "timestamp": event.timestamp,
        });

        let mut headers = self.headers.clone();
        if let Some(secret) = &self.signing_secret {
            let unsigned = serde_json::to_vec(&envelope).unwrap_or_default();
            let signature = hmac::sign_hex(secret.as_bytes(), &unsigned);
            envelope["signature"] = serde_json::Value::String(signature.clone());
            headers.push(("X-Multiclaude-Signature".to_string(), signature));
        }

        post_with_retry(&self.client, &self.name, &self.url, &headers, &envelope, MAX_RETRIES).await
    }
}

#[cfg(test)]
#[path = "webhook_tests.rs"]
mod tests;
