// SPDX-License-Identifier: MIT

//! mc-daemon: the orchestrator daemon (§4.9, §5). Owns durable state, the
//! control socket, and the background maintenance loops. Wires together
//! every other `mc-*` crate the way the teacher's `lifecycle` module wires
//! its runtime, listener, and reconciliation pieces.

pub mod cleanup;
pub mod config;
pub mod control_socket;
pub mod error;
pub mod health;
pub mod message_router;
pub mod pid_lock;
pub mod startup_recovery;

pub use config::DaemonConfig;
pub use error::{DaemonError, Result};
pub use pid_lock::PidLock;

use async_trait::async_trait;
use cleanup::CleanupLoop;
use control_socket::ControlContext;
use health::HealthLoop;
use mc_core::{Clock, SystemClock};
use mc_notify::{AdapterRegistration, NotificationConfig, NotificationHub, StatusProvider, StatusReport};
use mc_store::{MessageStore, StateStore};
use mc_tmux::{MultiplexerBackend, TmuxBackend};
use mc_worktree::{GitWorktreeBackend, WorktreeBackend};
use message_router::MessageRouter;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// A running daemon instance: the background tasks it spawned, plus shared
/// handles other components (the control socket, the HTTP status API) need.
pub struct Daemon {
    config: DaemonConfig,
    state: Arc<StateStore>,
    messages: Arc<MessageStore>,
    hub: Arc<NotificationHub>,
    control: Arc<ControlContext>,
    cancel: CancellationToken,
    pid_lock: Mutex<Option<PidLock>>,
    background: Mutex<Vec<tokio::task::JoinHandle<()>>>,
}

impl Daemon {
    /// Bring up a daemon: acquire the pid lock, load persisted state, run
    /// startup recovery, then spawn the control socket and every background
    /// loop. The returned `Arc<Daemon>` is also the sole [`StatusProvider`]
    /// for the HTTP status API (§4.8).
    pub async fn start(config: DaemonConfig) -> Result<Arc<Self>> {
        config.ensure_directories()?;
        let pid_lock = PidLock::acquire(config.pid_path.clone())?;

        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let state = Arc::new(StateStore::load(config.state_path.clone(), Arc::clone(&clock))?);
        let messages = Arc::new(MessageStore::new(config.messages_root.clone(), Arc::clone(&clock)));

        let tmux: Arc<dyn MultiplexerBackend> = Arc::new(TmuxBackend::new(config.tmux_socket.clone()));
        let worktree: Arc<dyn WorktreeBackend> = Arc::new(GitWorktreeBackend::new());

        let cancel = CancellationToken::new();

        let notify_config = load_notify_config(&config)?;
        let notify_enabled = notify_config.enabled;
        let adapters = notify_config
            .channels
            .iter()
            .filter(|c| c.enabled)
            .filter_map(|c| match mc_notify::build_adapter(c) {
                Ok(adapter) => Some(AdapterRegistration { adapter, interactive: None }),
                Err(e) => {
                    warn!(channel = %c.name, error = %e, "failed to build notification adapter, skipping");
                    None
                }
            })
            .collect();
        let api_config = notify_config.api.clone();
        let hub = Arc::new(NotificationHub::new(notify_config, adapters, Arc::clone(&clock)));

        startup_recovery::recover(&state, &tmux, &cancel).await;

        let control = Arc::new(ControlContext {
            state: Arc::clone(&state),
            messages: Arc::clone(&messages),
            tmux: Arc::clone(&tmux),
            clock: Arc::clone(&clock),
            start_time: Instant::now(),
            stop_requested: AtomicBool::new(false),
        });

        let daemon = Arc::new(Self {
            config: config.clone(),
            state,
            messages,
            hub: Arc::clone(&hub),
            control: Arc::clone(&control),
            cancel: cancel.clone(),
            pid_lock: Mutex::new(Some(pid_lock)),
            background: Mutex::new(Vec::new()),
        });

        hub.start();

        let mut handles = Vec::new();

        {
            let control = Arc::clone(&control);
            let socket_path = config.socket_path.clone();
            let cancel = cancel.clone();
            handles.push(tokio::spawn(async move {
                if let Err(e) = control_socket::serve(control, &socket_path, cancel).await {
                    warn!(error = %e, "control socket server exited with an error");
                }
            }));
        }

        {
            let health = HealthLoop {
                state: Arc::clone(&daemon.state),
                tmux: Arc::clone(&tmux),
                hub: Arc::clone(&hub),
                interval: config.health_interval,
                auto_kill_orphan_sessions: config.auto_kill_orphan_sessions,
            };
            let cancel = cancel.clone();
            handles.push(tokio::spawn(async move { health.run(cancel).await }));
        }

        {
            let router = MessageRouter {
                state: Arc::clone(&daemon.state),
                messages: Arc::clone(&daemon.messages),
                tmux: Arc::clone(&tmux),
                interval: config.message_router_interval,
            };
            let cancel = cancel.clone();
            handles.push(tokio::spawn(async move { router.run(cancel).await }));
        }

        {
            let cleanup = CleanupLoop {
                state: Arc::clone(&daemon.state),
                messages: Arc::clone(&daemon.messages),
                tmux: Arc::clone(&tmux),
                worktree: Arc::clone(&worktree),
                hub: Arc::clone(&hub),
                interval: config.cleanup_interval,
                worktrees_root: config.worktrees_root.clone(),
                reap_merged_branches: config.reap_merged_branches,
                reap_interval: config.reap_interval,
            };
            let cancel = cancel.clone();
            handles.push(tokio::spawn(async move { cleanup.run(cancel).await }));
        }

        if notify_enabled && api_config.enabled {
            let api_state = mc_notify::new_state(Arc::clone(&hub), daemon.clone() as Arc<dyn StatusProvider>, api_config);
            let cancel = cancel.clone();
            handles.push(tokio::spawn(async move {
                if let Err(e) = mc_notify::serve_http_api(api_state, cancel).await {
                    warn!(error = %e, "notification http api exited with an error");
                }
            }));
        }

        *daemon.background.lock() = handles;

        info!(socket = %daemon.config.socket_path.display(), "daemon started");
        Ok(daemon)
    }

    /// Whether the most recent `stop` control-socket verb was received.
    pub fn stop_was_requested(&self) -> bool {
        self.control.stop_was_requested()
    }

    /// Graceful shutdown (§4.9): cancel every background task, give them a
    /// bounded grace period to drain, then tear down the socket, the
    /// notification hub, and the pid lock. State is already durable —
    /// [`StateStore`] persists after every mutation.
    pub async fn stop(&self) {
        info!("daemon stopping");
        self.cancel.cancel();
        self.hub.stop().await;

        let handles = std::mem::take(&mut *self.background.lock());
        let drain = async {
            for handle in handles {
                let _ = handle.await;
            }
        };
        if tokio::time::timeout(std::time::Duration::from_secs(5), drain).await.is_err() {
            warn!("background tasks did not drain within the shutdown grace period");
        }

        if self.config.socket_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.config.socket_path) {
                warn!(error = %e, "failed to remove control socket on shutdown");
            }
        }

        if let Some(lock) = self.pid_lock.lock().take() {
            lock.release();
        }

        info!("daemon stopped");
    }
}

#[async_trait]
impl StatusProvider for Daemon {
    async fn status(&self, repo: Option<&str>) -> StatusReport {
        let repos = match repo {
            Some(name) => self.state.get_repo(name).map(|r| vec![r]).unwrap_or_default(),
            None => self.state.get_all_repos(),
        };
        let agents = serde_json::json!(repos
            .iter()
            .map(|r| {
                let agents: Vec<_> = r
                    .agents
                    .values()
                    .map(|a| serde_json::json!({
                        "name": a.name,
                        "kind": a.kind.to_string(),
                        "ready_for_cleanup": a.ready_for_cleanup,
                        "task": a.task,
                    }))
                    .collect();
                serde_json::json!({ "repo": r.name, "agents": agents })
            })
            .collect::<Vec<_>>());

        StatusReport { repo_name: repo.map(|s| s.to_string()), agents }
    }
}

fn load_notify_config(config: &DaemonConfig) -> Result<NotificationConfig> {
    let Some(path) = &config.notify_config_path else {
        return Ok(NotificationConfig::default());
    };
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(NotificationConfig::default()),
        Err(e) => return Err(e.into()),
    };
    let parsed =
        NotificationConfig::from_toml_str(&raw).map_err(|e| DaemonError::Config(format!("{}: {e}", path.display())))?;
    parsed.validate().map_err(|e| DaemonError::Config(format!("{}: {e}", path.display())))?;
    Ok(parsed)
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
