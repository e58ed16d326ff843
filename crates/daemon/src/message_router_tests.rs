// SPDX-License-Identifier: MIT

use super::*;
use mc_core::test_support::{test_repo, AgentBuilder};
use mc_core::FakeClock;
use mc_tmux::FakeMultiplexerBackend;
use tokio_util::sync::CancellationToken;

async fn router(with_window: bool) -> (tempfile::TempDir, MessageRouter, FakeMultiplexerBackend) {
    let tmp = tempfile::tempdir().unwrap();
    let clock: Arc<dyn mc_core::Clock> = Arc::new(FakeClock::new());
    let state = Arc::new(StateStore::load(tmp.path().join("state.json"), Arc::clone(&clock)).unwrap());
    let repo = test_repo("r");
    let agent = AgentBuilder::worker("w").build();
    let tmux_session = repo.tmux_session.clone();
    let tmux_window = agent.tmux_window.clone();
    let mut repo = repo;
    repo.agents.insert(agent.name.clone(), agent);
    state.add_repo(repo).unwrap();

    let messages = Arc::new(MessageStore::new(tmp.path().join("messages"), Arc::clone(&clock)));
    let fake_tmux = FakeMultiplexerBackend::new();
    if with_window {
        let cancel = CancellationToken::new();
        fake_tmux.create_session(&tmux_session, true, &cancel).await.unwrap();
        fake_tmux.create_window(&tmux_session, &tmux_window, &cancel).await.unwrap();
    }
    let tmux: Arc<dyn MultiplexerBackend> = Arc::new(fake_tmux.clone());
    let router = MessageRouter { state, messages, tmux, interval: Duration::from_millis(10) };
    (tmp, router, fake_tmux)
}

#[tokio::test]
async fn delivers_a_pending_message_and_promotes_it() {
    let (_tmp, router, tmux) = router(true).await;
    router.messages.send("r", "supervisor", "w", "hello").unwrap();

    router.tick(&CancellationToken::new()).await;

    let sent = tmux.sent_keys();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].text, "hello");
    assert!(sent[0].literal);

    let inbox = router.messages.list("r", "w").unwrap();
    assert_eq!(inbox[0].status, mc_core::MessageStatus::Delivered);
}

#[tokio::test]
async fn leaves_message_pending_when_the_window_is_missing() {
    let (_tmp, router, _tmux) = router(false).await;
    router.messages.send("r", "supervisor", "w", "hello").unwrap();

    router.tick(&CancellationToken::new()).await;

    let inbox = router.messages.list("r", "w").unwrap();
    assert_eq!(inbox[0].status, mc_core::MessageStatus::Pending);
}
