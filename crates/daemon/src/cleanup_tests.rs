// SPDX-License-Identifier: MIT

use super::*;
use mc_core::test_support::{test_repo, AgentBuilder};
use mc_core::FakeClock;
use mc_notify::{FakeNotifyAdapter, NotificationConfig};
use mc_tmux::FakeMultiplexerBackend;
use mc_worktree::FakeWorktreeBackend;
use tokio_util::sync::CancellationToken;

async fn fixture() -> (tempfile::TempDir, CleanupLoop, Arc<FakeNotifyAdapter>, FakeWorktreeBackend) {
    let tmp = tempfile::tempdir().unwrap();
    let clock: Arc<dyn mc_core::Clock> = Arc::new(FakeClock::new());
    let state = Arc::new(StateStore::load(tmp.path().join("state.json"), Arc::clone(&clock)).unwrap());
    let messages = Arc::new(MessageStore::new(tmp.path().join("messages"), Arc::clone(&clock)));

    let mut repo = test_repo("r");
    let agent = AgentBuilder::worker("w").ready_for_cleanup().build();
    let cancel = CancellationToken::new();
    let fake_tmux = FakeMultiplexerBackend::new();
    fake_tmux.create_session(&repo.tmux_session, true, &cancel).await.unwrap();
    fake_tmux.create_window(&repo.tmux_session, &agent.tmux_window, &cancel).await.unwrap();
    repo.agents.insert(agent.name.clone(), agent);
    state.add_repo(repo).unwrap();

    let worktree = FakeWorktreeBackend::new();
    let fake = FakeNotifyAdapter::new("fake");
    let hub = Arc::new(NotificationHub::new(
        NotificationConfig::default(),
        vec![mc_notify::AdapterRegistration { adapter: fake.clone() as Arc<dyn mc_notify::NotifyAdapter>, interactive: None }],
        Arc::new(FakeClock::new()),
    ));

    let cleanup = CleanupLoop {
        state,
        messages,
        tmux: Arc::new(fake_tmux),
        worktree: Arc::new(worktree.clone()),
        hub,
        interval: Duration::from_millis(10),
        worktrees_root: tmp.path().join("worktrees"),
        reap_merged_branches: false,
        reap_interval: Duration::from_secs(3600),
    };
    (tmp, cleanup, fake, worktree)
}

#[tokio::test]
async fn removes_a_clean_agent_ready_for_cleanup() {
    let (_tmp, cleanup, fake, _worktree) = fixture().await;

    cleanup.tick(&CancellationToken::new()).await;

    assert!(fake.sent().is_empty());
    let repos = cleanup.state.get_all_repos();
    assert!(repos[0].agents.is_empty());
}

#[tokio::test]
async fn holds_an_agent_with_uncommitted_changes() {
    let (_tmp, cleanup, fake, worktree) = fixture().await;
    worktree.mark_dirty(std::path::Path::new("/wts/r/w"));

    cleanup.tick(&CancellationToken::new()).await;

    assert_eq!(fake.sent().len(), 1);
    let repos = cleanup.state.get_all_repos();
    assert_eq!(repos[0].agents.len(), 1);
}

#[tokio::test]
async fn holds_an_agent_with_unpushed_commits() {
    let (_tmp, cleanup, fake, worktree) = fixture().await;
    worktree.mark_unpushed(std::path::Path::new("/wts/r/w"));

    cleanup.tick(&CancellationToken::new()).await;

    assert_eq!(fake.sent().len(), 1);
    let repos = cleanup.state.get_all_repos();
    assert_eq!(repos[0].agents.len(), 1);
}
