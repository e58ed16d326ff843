// SPDX-License-Identifier: MIT

//! Startup recovery (§5): for each repository recorded in persisted state,
//! recreate its tmux session and supervisor/merge-queue windows if the
//! session is absent. A session that's still alive is trusted as-is —
//! agents are left untouched, matching the teacher's "reconnect, don't
//! respawn" approach to live work found after a restart.

use mc_core::AgentKind;
use mc_store::StateStore;
use mc_tmux::MultiplexerBackend;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

pub async fn recover(state: &StateStore, tmux: &Arc<dyn MultiplexerBackend>, cancel: &CancellationToken) {
    for repo in state.get_all_repos() {
        let alive = match tmux.has_session(&repo.tmux_session, cancel).await {
            Ok(alive) => alive,
            Err(e) => {
                warn!(repo = %repo.name, error = %e, "failed to query session during startup recovery");
                continue;
            }
        };

        if alive {
            info!(repo = %repo.name, session = %repo.tmux_session, "session alive, trusting existing state");
            continue;
        }

        info!(repo = %repo.name, session = %repo.tmux_session, "session missing, recreating");
        if let Err(e) = tmux.create_session(&repo.tmux_session, true, cancel).await {
            warn!(repo = %repo.name, error = %e, "failed to recreate session");
            continue;
        }

        for agent in repo.agents.values().filter(|a| matches!(a.kind, AgentKind::Supervisor | AgentKind::MergeQueue)) {
            if let Err(e) = tmux.create_window(&repo.tmux_session, &agent.tmux_window, cancel).await {
                warn!(repo = %repo.name, agent = %agent.name, error = %e, "failed to recreate window");
            }
        }
    }
}

#[cfg(test)]
#[path = "startup_recovery_tests.rs"]
mod tests;
