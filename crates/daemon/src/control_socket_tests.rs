// SPDX-License-Identifier: MIT

use super::*;
use mc_core::FakeClock;
use mc_tmux::FakeMultiplexerBackend;
use mc_wire::Request;
use std::sync::atomic::AtomicBool;

fn context() -> (tempfile::TempDir, ControlContext) {
    let tmp = tempfile::tempdir().unwrap();
    let clock: Arc<dyn Clock> = Arc::new(FakeClock::new());
    let state = StateStore::load(tmp.path().join("state.json"), Arc::clone(&clock)).unwrap();
    let messages = MessageStore::new(tmp.path().join("messages"), Arc::clone(&clock));
    let ctx = ControlContext {
        state: Arc::new(state),
        messages: Arc::new(messages),
        tmux: Arc::new(FakeMultiplexerBackend::new()),
        clock,
        start_time: Instant::now(),
        stop_requested: AtomicBool::new(false),
    };
    (tmp, ctx)
}

#[tokio::test]
async fn ping_succeeds() {
    let (_tmp, ctx) = context();
    let response = dispatch(&ctx, &Request::new("ping")).await;
    assert!(response.success);
}

#[tokio::test]
async fn unknown_command_fails_without_aborting() {
    let (_tmp, ctx) = context();
    let response = dispatch(&ctx, &Request::new("not_a_verb")).await;
    assert!(!response.success);
    assert!(response.error.unwrap().contains("unknown command"));
}

#[tokio::test]
async fn add_repo_then_list_repos_round_trips() {
    let (_tmp, ctx) = context();
    let request = Request::new("add_repo").with_arg("name", "r").with_arg("github_url", "x").with_arg("tmux_session", "mc-r");
    let response = dispatch(&ctx, &request).await;
    assert!(response.success);

    let response = dispatch(&ctx, &Request::new("list_repos")).await;
    let repos: Vec<String> = serde_json::from_value(response.data.unwrap()).unwrap();
    assert_eq!(repos, vec!["r".to_string()]);
}

#[tokio::test]
async fn add_agent_missing_required_arg_fails_without_aborting() {
    let (_tmp, ctx) = context();
    let request = Request::new("add_agent").with_arg("repo", "r");
    let response = dispatch(&ctx, &request).await;
    assert!(!response.success);
}

#[tokio::test]
async fn full_repo_and_agent_lifecycle() {
    let (_tmp, ctx) = context();
    dispatch(&ctx, &Request::new("add_repo").with_arg("name", "r").with_arg("github_url", "x").with_arg("tmux_session", "mc-r")).await;

    let add_supervisor = Request::new("add_agent")
        .with_arg("repo", "r")
        .with_arg("agent", "supervisor")
        .with_arg("type", "supervisor")
        .with_arg("worktree_path", "/p/r")
        .with_arg("tmux_window", "supervisor");
    assert!(dispatch(&ctx, &add_supervisor).await.success);

    let add_worker = Request::new("add_agent")
        .with_arg("repo", "r")
        .with_arg("agent", "w")
        .with_arg("type", "worker")
        .with_arg("worktree_path", "/p/wts/r/w")
        .with_arg("tmux_window", "w")
        .with_arg("task", "fix");
    assert!(dispatch(&ctx, &add_worker).await.success);

    let response = dispatch(&ctx, &Request::new("list_agents").with_arg("repo", "r")).await;
    let agents: Vec<String> = serde_json::from_value(response.data.unwrap()).unwrap();
    assert_eq!(agents, vec!["supervisor".to_string(), "w".to_string()]);

    let response = dispatch(&ctx, &Request::new("remove_agent").with_arg("repo", "r").with_arg("agent", "w")).await;
    assert!(response.success);

    let history = ctx.state.get_task_history("r", 10).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].name, "w");
    assert_eq!(history[0].task, "fix");
}

#[tokio::test]
async fn message_round_trip_through_the_control_socket() {
    let (_tmp, ctx) = context();
    let send = Request::new("send_message").with_arg("repo", "r").with_arg("from", "supervisor").with_arg("to", "w").with_arg("body", "hello");
    let response = dispatch(&ctx, &send).await;
    assert!(response.success);

    let response = dispatch(&ctx, &Request::new("list_messages").with_arg("repo", "r").with_arg("agent", "w")).await;
    let messages: Vec<mc_core::Message> = serde_json::from_value(response.data.unwrap()).unwrap();
    assert_eq!(messages.len(), 1);
    let id = messages[0].id.as_str().to_string();

    ctx.messages.mark_delivered("r", "w", &id).unwrap();
    let response = dispatch(&ctx, &Request::new("read_message").with_arg("repo", "r").with_arg("agent", "w").with_arg("id", id.clone())).await;
    assert!(response.success);

    let response = dispatch(&ctx, &Request::new("ack_message").with_arg("repo", "r").with_arg("agent", "w").with_arg("id", id)).await;
    assert!(response.success);
}

#[tokio::test]
async fn stop_marks_the_context_for_shutdown() {
    let (_tmp, ctx) = context();
    let response = dispatch(&ctx, &Request::new("stop")).await;
    assert!(response.success);
    assert!(ctx.stop_was_requested());
}

#[tokio::test]
async fn complete_agent_sets_ready_for_cleanup() {
    let (_tmp, ctx) = context();
    dispatch(&ctx, &Request::new("add_repo").with_arg("name", "r").with_arg("github_url", "x").with_arg("tmux_session", "mc-r")).await;
    let add = Request::new("add_agent")
        .with_arg("repo", "r")
        .with_arg("agent", "w")
        .with_arg("type", "worker")
        .with_arg("worktree_path", "/p/wts/r/w")
        .with_arg("tmux_window", "w");
    dispatch(&ctx, &add).await;

    let response = dispatch(&ctx, &Request::new("complete_agent").with_arg("repo", "r").with_arg("agent", "w")).await;
    assert!(response.success);
    let agent = ctx.state.get_agent("r", "w").unwrap();
    assert!(agent.ready_for_cleanup);
}
