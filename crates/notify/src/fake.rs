// SPDX-License-Identifier: MIT

//! Fake adapter for hub-level unit tests, mirroring the shape of the real
//! adapters without touching the network.

use crate::adapter::{InteractiveAdapter, NotifyAdapter, ResponseHandler};
use crate::config::ChannelType;
use crate::error::{NotifyError, Result};
use async_trait::async_trait;
use mc_core::Event;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

struct State {
    sent: Vec<Event>,
    closed: bool,
    fail_next: bool,
}

/// Records every event it is asked to send; can be told to fail the next
/// send to exercise the hub's composite-error path.
pub struct FakeNotifyAdapter {
    name: String,
    channel_type: ChannelType,
    state: Mutex<State>,
}

impl FakeNotifyAdapter {
    pub fn new(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self { name: name.into(), channel_type: ChannelType::Webhook, state: Mutex::new(State { sent: Vec::new(), closed: false, fail_next: false }) })
    }

    pub fn with_channel_type(name: impl Into<String>, channel_type: ChannelType) -> Arc<Self> {
        Arc::new(Self { name: name.into(), channel_type, state: Mutex::new(State { sent: Vec::new(), closed: false, fail_next: false }) })
    }

    pub fn sent(&self) -> Vec<Event> {
        self.state.lock().sent.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    pub fn fail_next_send(&self) {
        self.state.lock().fail_next = true;
    }
}

#[async_trait]
impl NotifyAdapter for FakeNotifyAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn channel_type(&self) -> ChannelType {
        self.channel_type
    }

    async fn send(&self, event: &Event) -> Result<()> {
        let mut state = self.state.lock();
        if state.fail_next {
            state.fail_next = false;
            return Err(NotifyError::SendFailed(self.name.clone(), "forced failure".to_string()));
        }
        state.sent.push(event.clone());
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.state.lock().closed = true;
        Ok(())
    }
}

/// Interactive fake: `deliver_response` simulates an inbound callback.
pub struct FakeInteractiveAdapter {
    inner: Arc<FakeNotifyAdapter>,
    handler: Mutex<Option<ResponseHandler>>,
}

impl FakeInteractiveAdapter {
    pub fn new(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self { inner: FakeNotifyAdapter::new(name), handler: Mutex::new(None) })
    }

    pub fn deliver_response(&self, response: mc_core::Response) {
        if let Some(handler) = self.handler.lock().as_ref() {
            handler(response);
        }
    }

    pub fn sent(&self) -> Vec<Event> {
        self.inner.sent()
    }
}

#[async_trait]
impl NotifyAdapter for FakeInteractiveAdapter {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn channel_type(&self) -> ChannelType {
        self.inner.channel_type()
    }

    async fn send(&self, event: &Event) -> Result<()> {
        self.inner.send(event).await
    }

    fn supports_responses(&self) -> bool {
        true
    }

    async fn close(&self) -> Result<()> {
        self.inner.close().await
    }
}

#[async_trait]
impl InteractiveAdapter for FakeInteractiveAdapter {
    fn set_response_handler(&self, handler: ResponseHandler) {
        *self.handler.lock() = Some(handler);
    }

    async fn start(&self, cancel: CancellationToken) -> Result<()> {
        cancel.cancelled().await;
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
