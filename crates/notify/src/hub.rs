// SPDX-License-Identifier: MIT

//! The notification hub: fan-out with filter, dedup, rate-limit and
//! quiet-hours suppression, plus pending-reply tracking (§4.6).

use crate::adapter::{InteractiveAdapter, NotifyAdapter, ResponseHandler};
use crate::config::{EventRule, NotificationConfig};
use crate::dedup::DedupTable;
use crate::error::{CompositeError, NotifyError, Result};
use crate::filter::Filter;
use crate::pending::PendingTable;
use crate::quiet_hours::is_quiet;
use crate::rate_limit::RateLimiter;
use chrono::Duration as ChronoDuration;
use mc_core::{Clock, Event, Response};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const SEND_TIMEOUT: Duration = Duration::from_secs(10);
const SWEEP_INTERVAL: Duration = Duration::from_secs(300);
const DEDUP_WINDOW: ChronoDuration = ChronoDuration::minutes(5);

struct Registration {
    adapter: Arc<dyn NotifyAdapter>,
    filter: Filter,
    rate_limiter: RateLimiter,
    interactive: Option<Arc<dyn InteractiveAdapter>>,
}

pub struct NotificationHub {
    config: NotificationConfig,
    registrations: Vec<Registration>,
    dedup: DedupTable,
    pending: PendingTable,
    clock: Arc<dyn Clock>,
    response_handler: Mutex<Option<ResponseHandler>>,
    cancel: CancellationToken,
}

/// One registered adapter, with its derived filter and whether it also
/// implements the interactive extension.
pub struct AdapterRegistration {
    pub adapter: Arc<dyn NotifyAdapter>,
    pub interactive: Option<Arc<dyn InteractiveAdapter>>,
}

impl NotificationHub {
    pub fn new(config: NotificationConfig, adapters: Vec<AdapterRegistration>, clock: Arc<dyn Clock>) -> Self {
        let cooldown = ChronoDuration::seconds(config.rate_limit.cooldown_after_burst_seconds as i64);
        let registrations = adapters
            .into_iter()
            .map(|reg| {
                let filter = derive_filter(&config, reg.adapter.name());
                Registration {
                    rate_limiter: RateLimiter::new(config.rate_limit.max_per_minute, cooldown),
                    adapter: reg.adapter,
                    filter,
                    interactive: reg.interactive,
                }
            })
            .collect();
        Self {
            config,
            registrations,
            dedup: DedupTable::new(DEDUP_WINDOW),
            pending: PendingTable::new(),
            clock,
            response_handler: Mutex::new(None),
            cancel: CancellationToken::new(),
        }
    }

    pub fn set_response_handler(&self, handler: ResponseHandler) {
        *self.response_handler.lock() = Some(handler.clone());
        for registration in &self.registrations {
            if let Some(interactive) = &registration.interactive {
                interactive.set_response_handler(handler.clone());
            }
        }
    }

    /// Launches every interactive adapter's inbound server plus the
    /// periodic dedup/pending sweeper, all anchored to this hub's
    /// cancellation token.
    pub fn start(self: &Arc<Self>) {
        for registration in &self.registrations {
            if let Some(interactive) = registration.interactive.clone() {
                let cancel = self.cancel.clone();
                tokio::spawn(async move {
                    if let Err(e) = interactive.start(cancel).await {
                        tracing::warn!(error = %e, "interactive adapter exited with an error");
                    }
                });
            }
        }

        let hub = Arc::clone(self);
        tokio::spawn(async move { hub.sweep_loop().await });
    }

    async fn sweep_loop(self: Arc<Self>) {
        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => return,
                _ = tokio::time::sleep(SWEEP_INTERVAL) => {
                    let now = self.clock.now();
                    self.dedup.sweep(now);
                    self.pending.sweep(now);
                }
            }
        }
    }

    /// Cancels the root context and closes every adapter. Does not wait for
    /// spawned tasks beyond issuing the cancellation; callers that need a
    /// bounded join should await the handles returned by `start`.
    pub async fn stop(&self) {
        self.cancel.cancel();
        for registration in &self.registrations {
            if let Err(e) = registration.adapter.close().await {
                tracing::warn!(adapter = registration.adapter.name(), error = %e, "error closing adapter");
            }
        }
    }

    pub fn handle_response(&self, response: Response) {
        if let Some(handler) = self.response_handler.lock().as_ref() {
            handler(response);
        }
    }

    pub fn pending_event(&self, reply_id: &mc_core::ReplyId) -> Option<Event> {
        self.pending.get(reply_id)
    }

    pub fn adapter_names(&self) -> Vec<String> {
        self.registrations.iter().map(|r| r.adapter.name().to_string()).collect()
    }

    /// Runs the full fan-out pipeline for one event (§4.6 steps 1-5).
    pub async fn notify(&self, mut event: Event) -> std::result::Result<(), CompositeError> {
        let now = self.clock.now();

        if self.config.quiet_hours.enabled {
            match is_quiet(&self.config.quiet_hours, now) {
                Ok(true) => return Ok(()),
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "quiet hours check failed; notifying anyway");
                }
            }
        }

        if self.dedup.check_and_record(&event.fingerprint(), now) {
            return Ok(());
        }

        if event.action_required && event.response_id.is_none() {
            let reply_id = mc_core::ReplyId::new();
            event.response_id = Some(reply_id);
            self.pending.insert(reply_id, event.clone(), now);
        }

        let mut composite = CompositeError::default();
        for registration in &self.registrations {
            if !registration.filter.matches(event.event_type, event.priority, &event.repo_name) {
                continue;
            }
            if !registration.rate_limiter.try_acquire(now) {
                continue;
            }
            let result = tokio::time::timeout(SEND_TIMEOUT, registration.adapter.send(&event)).await;
            match result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => composite.failures.push(e),
                Err(_) => composite.failures.push(NotifyError::Timeout(registration.adapter.name().to_string())),
            }
        }

        if composite.is_empty() {
            Ok(())
        } else {
            Err(composite)
        }
    }
}

/// Builds the per-channel filter from the configured event→channel rules:
/// a channel's allowed event types are those whose rule lists the channel
/// (or every type, when no rule names it explicitly anywhere); its minimum
/// priority is the tightest bound among the rules that name it.
fn derive_filter(config: &NotificationConfig, channel_name: &str) -> Filter {
    let mut matching: Vec<(&mc_core::EventType, &EventRule)> =
        config.events.iter().filter(|(_, rule)| rule.enabled && rule.channels.iter().any(|c| c == channel_name)).collect();

    let any_rule_names_a_channel = config.events.values().any(|rule| !rule.channels.is_empty());

    if !any_rule_names_a_channel {
        return Filter::default();
    }

    matching.sort_by_key(|(event_type, _)| event_type.to_string());
    let event_types = matching.iter().map(|(t, _)| **t).collect::<Vec<_>>();
    let min_priority = matching.iter().filter_map(|(_, rule)| rule.min_priority).min();

    Filter { event_types, min_priority, repos: Vec::new(), excluded_repos: Vec::new() }
}

#[cfg(test)]
#[path = "hub_tests.rs"]
mod tests;
