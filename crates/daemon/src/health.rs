// SPDX-License-Identifier: MIT

//! Health loop (§4.9): every tick, confirm every tracked agent's (session,
//! window) pair still exists, detect orphan sessions/worktrees, and verify
//! the recorded pane process is alive. Findings become `agent.error` /
//! `agent.stuck` notifications; the session itself is only killed when
//! `auto_kill_orphan_sessions` is set (Open Question resolution #2).

use mc_core::{Event, EventType};
use mc_notify::NotificationHub;
use mc_store::StateStore;
use mc_tmux::MultiplexerBackend;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub struct HealthLoop {
    pub state: Arc<StateStore>,
    pub tmux: Arc<dyn MultiplexerBackend>,
    pub hub: Arc<NotificationHub>,
    pub interval: Duration,
    pub auto_kill_orphan_sessions: bool,
}

impl HealthLoop {
    pub async fn run(&self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.interval);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("health loop cancelled");
                    return;
                }
                _ = ticker.tick() => {
                    self.tick(&cancel).await;
                }
            }
        }
    }

    async fn tick(&self, cancel: &CancellationToken) {
        let repos = self.state.get_all_repos();
        let tracked_sessions: Vec<String> = repos.iter().map(|r| r.tmux_session.clone()).collect();

        for repo in &repos {
            match self.tmux.has_session(&repo.tmux_session, cancel).await {
                Ok(true) => {}
                Ok(false) => {
                    warn!(repo = %repo.name, session = %repo.tmux_session, "tracked session is missing");
                    self.publish(&repo.name, None, EventType::AgentError, "session missing", &format!("session {} not found", repo.tmux_session)).await;
                    continue;
                }
                Err(e) => {
                    warn!(repo = %repo.name, error = %e, "failed to query session");
                    continue;
                }
            }

            for agent in repo.agents.values() {
                match self.tmux.has_window(&repo.tmux_session, &agent.tmux_window, cancel).await {
                    Ok(true) => {}
                    Ok(false) => {
                        warn!(repo = %repo.name, agent = %agent.name, "tracked window is missing");
                        self.publish(&repo.name, Some(&agent.name), EventType::AgentStuck, "window missing", &format!("window {} not found", agent.tmux_window)).await;
                        continue;
                    }
                    Err(e) => {
                        warn!(repo = %repo.name, agent = %agent.name, error = %e, "failed to query window");
                        continue;
                    }
                }

                if let Some(pid) = agent.pane_pid {
                    if !pid_is_alive(pid) {
                        warn!(repo = %repo.name, agent = %agent.name, pid, "pane process is no longer alive");
                        self.publish(&repo.name, Some(&agent.name), EventType::AgentError, "pane process died", &format!("pid {pid} is no longer alive")).await;
                    }
                }
            }
        }

        self.check_orphan_sessions(&tracked_sessions, cancel).await;
    }

    async fn check_orphan_sessions(&self, tracked: &[String], cancel: &CancellationToken) {
        let sessions = match self.tmux.list_sessions(cancel).await {
            Ok(s) => s,
            Err(e) => {
                warn!(error = %e, "failed to list sessions for orphan check");
                return;
            }
        };
        for session in sessions {
            if tracked.iter().any(|s| s == &session) {
                continue;
            }
            warn!(session = %session, "orphan session with no matching repository");
            if self.auto_kill_orphan_sessions {
                if let Err(e) = self.tmux.kill_session(&session, cancel).await {
                    warn!(session = %session, error = %e, "failed to kill orphan session");
                } else {
                    info!(session = %session, "killed orphan session");
                }
            }
        }
    }

    async fn publish(&self, repo: &str, agent: Option<&str>, event_type: EventType, title: &str, message: &str) {
        let mut event = Event::new(repo, event_type, title, message);
        event.agent_name = agent.map(|a| a.to_string());
        if let Err(e) = self.hub.notify(event).await {
            warn!(error = %e, "failed to publish health notification");
        }
    }
}

fn pid_is_alive(pid: i32) -> bool {
    nix::sys::signal::kill(nix::unistd::Pid::from_raw(pid), None).is_ok()
}

#[cfg(test)]
#[path = "health_tests.rs"]
mod tests;
