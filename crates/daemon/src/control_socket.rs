// SPDX-License-Identifier: MIT

//! Control socket server (§4.5, §6.1): one JSON request, one JSON reply per
//! connection, serviced on an independent task so slow handlers never block
//! accepts, mirroring the teacher's `listener::Listener::run_unix_only`.

use crate::error::Result as DaemonResult;
use mc_core::{Agent, AgentKind, Clock, Repository};
use mc_store::{MessageStore, StateStore};
use mc_tmux::MultiplexerBackend;
use mc_wire::{read_request, write_response, Request, Response};
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::io::BufReader;
use tokio::net::UnixListener;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Shared context handed to every connection handler.
pub struct ControlContext {
    pub state: Arc<StateStore>,
    pub messages: Arc<MessageStore>,
    pub tmux: Arc<dyn MultiplexerBackend>,
    pub clock: Arc<dyn Clock>,
    pub start_time: Instant,
    /// Set by the `stop` verb; the root daemon task polls this to begin
    /// graceful shutdown once the reply for that connection has been sent.
    pub stop_requested: AtomicBool,
}

impl ControlContext {
    pub fn stop_was_requested(&self) -> bool {
        self.stop_requested.load(Ordering::SeqCst)
    }
}

/// Bind the socket (removing a stale file from a prior crash), set
/// permission 0600, and accept connections until `cancel` fires.
pub async fn serve(ctx: Arc<ControlContext>, socket_path: &Path, cancel: CancellationToken) -> DaemonResult<()> {
    if let Some(parent) = socket_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    if socket_path.exists() {
        std::fs::remove_file(socket_path)?;
    }
    let listener = UnixListener::bind(socket_path)?;
    std::fs::set_permissions(socket_path, std::fs::Permissions::from_mode(0o600))?;
    info!(path = %socket_path.display(), "control socket listening");

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!("control socket accept loop cancelled");
                return Ok(());
            }
            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, _addr)) => {
                        let ctx = Arc::clone(&ctx);
                        tokio::spawn(async move {
                            if let Err(e) = handle_connection(stream, &ctx).await {
                                warn!(error = %e, "control connection failed");
                            }
                        });
                    }
                    Err(e) => error!(error = %e, "control socket accept error"),
                }
            }
        }
    }
}

async fn handle_connection(stream: tokio::net::UnixStream, ctx: &ControlContext) -> mc_wire::Result<()> {
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);
    let request = match read_request(&mut reader).await {
        Ok(r) => r,
        Err(e) => {
            let response = Response::err(e.to_string());
            return write_response(&mut write_half, &response).await;
        }
    };
    let response = dispatch(ctx, &request).await;
    write_response(&mut write_half, &response).await
}

async fn dispatch(ctx: &ControlContext, request: &Request) -> Response {
    debug!(command = %request.command, "dispatching control verb");
    match request.command.as_str() {
        "ping" => Response::ok(serde_json::json!({"pong": true})),
        "stop" => {
            ctx.stop_requested.store(true, Ordering::SeqCst);
            Response::ok_empty()
        }
        "status" => handle_status(ctx),
        "add_repo" => handle_add_repo(ctx, request),
        "list_repos" => Response::ok(ctx.state.list_repos()),
        "remove_repo" => handle_remove_repo(ctx, request),
        "add_agent" => handle_add_agent(ctx, request),
        "remove_agent" => handle_remove_agent(ctx, request),
        "list_agents" => handle_list_agents(ctx, request),
        "complete_agent" => handle_complete_agent(ctx, request),
        "send_message" => handle_send_message(ctx, request),
        "list_messages" => handle_list_messages(ctx, request),
        "read_message" => handle_read_message(ctx, request),
        "ack_message" => handle_ack_message(ctx, request),
        other => Response::err(format!("unknown command: {other}")),
    }
}

fn handle_status(ctx: &ControlContext) -> Response {
    let repos = ctx.state.get_all_repos();
    let uptime_secs = ctx.start_time.elapsed().as_secs();
    Response::ok(serde_json::json!({
        "uptime_secs": uptime_secs,
        "repo_count": repos.len(),
        "repos": repos.iter().map(|r| r.name.clone()).collect::<Vec<_>>(),
    }))
}

fn handle_add_repo(ctx: &ControlContext, request: &Request) -> Response {
    let name = match request.require_str("name") {
        Ok(v) => v,
        Err(e) => return Response::err(e.to_string()),
    };
    let origin = request.optional_str("github_url").ok().flatten().unwrap_or("").to_string();
    let tmux_session = match request.require_str("tmux_session") {
        Ok(v) => v.to_string(),
        Err(e) => return Response::err(e.to_string()),
    };
    let repo = Repository::new(name, origin, tmux_session);
    match ctx.state.add_repo(repo) {
        Ok(()) => Response::ok_empty(),
        Err(e) => Response::err(e),
    }
}

fn handle_remove_repo(ctx: &ControlContext, request: &Request) -> Response {
    let name = match request.require_str("name") {
        Ok(v) => v,
        Err(e) => return Response::err(e.to_string()),
    };
    match ctx.state.remove_repo(name) {
        Ok(_) => {
            if let Err(e) = ctx.messages.remove_repo(name) {
                warn!(repo = name, error = %e, "failed to remove message inbox tree for removed repo");
            }
            Response::ok_empty()
        }
        Err(e) => Response::err(e),
    }
}

fn handle_add_agent(ctx: &ControlContext, request: &Request) -> Response {
    let repo = match request.require_str("repo") {
        Ok(v) => v,
        Err(e) => return Response::err(e.to_string()),
    };
    let name = match request.require_str("agent") {
        Ok(v) => v,
        Err(e) => return Response::err(e.to_string()),
    };
    let kind_str = match request.require_str("type") {
        Ok(v) => v,
        Err(e) => return Response::err(e.to_string()),
    };
    let kind: AgentKind = match kind_str.parse() {
        Ok(k) => k,
        Err(e) => return Response::err(e),
    };
    let worktree_path = match request.require_str("worktree_path") {
        Ok(v) => v,
        Err(e) => return Response::err(e.to_string()),
    };
    let tmux_window = match request.require_str("tmux_window") {
        Ok(v) => v,
        Err(e) => return Response::err(e.to_string()),
    };
    let task = request.optional_str("task").ok().flatten().unwrap_or("").to_string();

    let agent = Agent::new(name, kind, worktree_path.into(), tmux_window, task, ctx.clock.now());
    match ctx.state.add_agent(repo, agent) {
        Ok(()) => Response::ok_empty(),
        Err(e) => Response::err(e),
    }
}

fn handle_remove_agent(ctx: &ControlContext, request: &Request) -> Response {
    let (repo, agent) = match require_repo_agent(request) {
        Ok(v) => v,
        Err(e) => return e,
    };
    match ctx.state.remove_agent(repo, agent) {
        Ok(_) => Response::ok_empty(),
        Err(e) => Response::err(e),
    }
}

fn handle_list_agents(ctx: &ControlContext, request: &Request) -> Response {
    let repo = match request.require_str("repo") {
        Ok(v) => v,
        Err(e) => return Response::err(e.to_string()),
    };
    match ctx.state.get_repo(repo) {
        Ok(repo) => {
            let mut names: Vec<String> = repo.agents.keys().cloned().collect();
            names.sort();
            Response::ok(names)
        }
        Err(e) => Response::err(e),
    }
}

fn handle_complete_agent(ctx: &ControlContext, request: &Request) -> Response {
    let (repo, agent) = match require_repo_agent(request) {
        Ok(v) => v,
        Err(e) => return e,
    };
    match ctx.state.update_agent(repo, agent, |a| a.ready_for_cleanup = true) {
        Ok(_) => Response::ok_empty(),
        Err(e) => Response::err(e),
    }
}

fn handle_send_message(ctx: &ControlContext, request: &Request) -> Response {
    let repo = match request.require_str("repo") {
        Ok(v) => v,
        Err(e) => return Response::err(e.to_string()),
    };
    let from = match request.require_str("from") {
        Ok(v) => v,
        Err(e) => return Response::err(e.to_string()),
    };
    let to = match request.require_str("to") {
        Ok(v) => v,
        Err(e) => return Response::err(e.to_string()),
    };
    let body = match request.require_str("body") {
        Ok(v) => v,
        Err(e) => return Response::err(e.to_string()),
    };
    match ctx.messages.send(repo, from, to, body) {
        Ok(message) => Response::ok(message),
        Err(e) => Response::err(e),
    }
}

fn handle_list_messages(ctx: &ControlContext, request: &Request) -> Response {
    let (repo, agent) = match require_repo_agent(request) {
        Ok(v) => v,
        Err(e) => return e,
    };
    match ctx.messages.list(repo, agent) {
        Ok(messages) => Response::ok(messages),
        Err(e) => Response::err(e),
    }
}

fn handle_read_message(ctx: &ControlContext, request: &Request) -> Response {
    let (repo, agent, id) = match require_repo_agent_id(request) {
        Ok(v) => v,
        Err(e) => return e,
    };
    match ctx.messages.read(repo, agent, id) {
        Ok(message) => Response::ok(message),
        Err(e) => Response::err(e),
    }
}

fn handle_ack_message(ctx: &ControlContext, request: &Request) -> Response {
    let (repo, agent, id) = match require_repo_agent_id(request) {
        Ok(v) => v,
        Err(e) => return e,
    };
    match ctx.messages.ack(repo, agent, id) {
        Ok(message) => Response::ok(message),
        Err(e) => Response::err(e),
    }
}

fn require_repo_agent<'a>(request: &'a Request) -> std::result::Result<(&'a str, &'a str), Response> {
    let repo = request.require_str("repo").map_err(|e| Response::err(e.to_string()))?;
    let agent = request.require_str("agent").map_err(|e| Response::err(e.to_string()))?;
    Ok((repo, agent))
}

fn require_repo_agent_id<'a>(request: &'a Request) -> std::result::Result<(&'a str, &'a str, &'a str), Response> {
    let repo = request.require_str("repo").map_err(|e| Response::err(e.to_string()))?;
    let agent = request.require_str("agent").map_err(|e| Response::err(e.to_string()))?;
    let id = request.require_str("id").map_err(|e| Response::err(e.to_string()))?;
    Ok((repo, agent, id))
}

#[cfg(test)]
#[path = "control_socket_tests.rs"]
mod tests;
