// SPDX-License-Identifier: MIT

//! Built-in notification adapters (§4.7): one native-payload formatter per
//! channel type, sharing a single retrying HTTP send helper.

mod discord;
mod slack;
mod telegram;
mod webhook;

pub use discord::DiscordAdapter;
pub use slack::SlackAdapter;
pub use telegram::TelegramAdapter;
pub use webhook::WebhookAdapter;

use crate::error::{NotifyError, Result};
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;

/// POSTs `body` to `url`, retrying transient 5xx responses with exponential
/// back-off. `name` identifies the adapter in error messages.
pub(crate) async fn post_with_retry(
    client: &reqwest::Client,
    name: &str,
    url: &str,
    headers: &[(String, String)],
    body: &Value,
    max_retries: u32,
) -> Result<()> {
    let mut attempt = 0;
    loop {
        let mut request = client.post(url).json(body);
        for (key, value) in headers {
            request = request.header(key, value);
        }

        let outcome = request.send().await;
        match outcome {
            Ok(response) if response.status().is_success() => return Ok(()),
            Ok(response) if is_retryable(response.status()) && attempt < max_retries => {
                attempt += 1;
                tokio::time::sleep(backoff(attempt)).await;
                continue;
            }
            Ok(response) => {
                let status = response.status();
                let text = response.text().await.unwrap_or_default();
                return Err(NotifyError::SendFailed(name.to_string(), format!("{status}: {text}")));
            }
            Err(_) if attempt < max_retries => {
                attempt += 1;
                tokio::time::sleep(backoff(attempt)).await;
                continue;
            }
            Err(e) => return Err(NotifyError::SendFailed(name.to_string(), e.to_string())),
        }
    }
}

fn is_retryable(status: StatusCode) -> bool {
    status.is_server_error()
}

fn backoff(attempt: u32) -> Duration {
    Duration::from_millis(200 * 2u64.saturating_pow(attempt.min(10)))
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
