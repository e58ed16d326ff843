// SPDX-License-Identifier: MIT

//! Uniform adapter contract (§4.7): `name`, `channel_type`, `send`,
//! `supports_responses`, `close`, plus the interactive extension for
//! adapters that run their own inbound server and call back with replies.

use crate::config::ChannelType;
use crate::error::Result;
use async_trait::async_trait;
use mc_core::{Event, Response};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Invoked by an interactive adapter when an inbound reply arrives. Forwards
/// to the hub's `handle_response`.
pub type ResponseHandler = Arc<dyn Fn(Response) + Send + Sync>;

#[async_trait]
pub trait NotifyAdapter: Send + Sync + 'static {
    fn name(&self) -> &str;

    fn channel_type(&self) -> ChannelType;

    async fn send(&self, event: &Event) -> Result<()>;

    /// Whether this adapter can carry a user's reply back to the hub.
    fn supports_responses(&self) -> bool {
        false
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// Extension for adapters that accept inbound replies (chat buttons, message
/// replies, signed webhooks). `start` runs for the adapter's lifetime and
/// should return once `cancel` fires.
#[async_trait]
pub trait InteractiveAdapter: NotifyAdapter {
    fn set_response_handler(&self, handler: ResponseHandler);

    async fn start(&self, cancel: CancellationToken) -> Result<()>;
}
