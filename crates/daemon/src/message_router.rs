// SPDX-License-Identifier: MIT

//! Message router (§4.9): for every `pending` message, deliver its body
//! into the recipient's pane via the literal+Enter primitive, then promote
//! to `delivered`. A delivery failure leaves the message `pending` so the
//! next tick retries it.

use mc_store::{MessageStore, StateStore};
use mc_tmux::MultiplexerBackend;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

pub struct MessageRouter {
    pub state: Arc<StateStore>,
    pub messages: Arc<MessageStore>,
    pub tmux: Arc<dyn MultiplexerBackend>,
    pub interval: Duration,
}

impl MessageRouter {
    pub async fn run(&self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.interval);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("message router cancelled");
                    return;
                }
                _ = ticker.tick() => {
                    self.tick(&cancel).await;
                }
            }
        }
    }

    async fn tick(&self, cancel: &CancellationToken) {
        for repo in self.state.get_all_repos() {
            for agent in repo.agents.values() {
                let inbox = match self.messages.list(&repo.name, &agent.name) {
                    Ok(messages) => messages,
                    Err(e) => {
                        warn!(repo = %repo.name, agent = %agent.name, error = %e, "failed to list inbox");
                        continue;
                    }
                };

                for message in inbox.into_iter().filter(|m| m.status == mc_core::MessageStatus::Pending) {
                    let sent = self
                        .tmux
                        .send_keys_literal_with_enter(&repo.tmux_session, &agent.tmux_window, &message.body, cancel)
                        .await;
                    match sent {
                        Ok(()) => {
                            if let Err(e) = self.messages.mark_delivered(&repo.name, &agent.name, message.id.as_str()) {
                                warn!(repo = %repo.name, agent = %agent.name, error = %e, "failed to mark message delivered");
                            }
                        }
                        Err(e) => {
                            debug!(repo = %repo.name, agent = %agent.name, error = %e, "message delivery failed, retrying next tick");
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "message_router_tests.rs"]
mod tests;
