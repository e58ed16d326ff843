// SPDX-License-Identifier: MIT

use super::*;
use mc_core::test_support::{test_repo, AgentBuilder};
use mc_core::FakeClock;
use mc_tmux::FakeMultiplexerBackend;
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn recreates_session_and_windows_when_the_session_is_missing() {
    let tmp = tempfile::tempdir().unwrap();
    let clock: Arc<dyn mc_core::Clock> = Arc::new(FakeClock::new());
    let state = StateStore::load(tmp.path().join("state.json"), clock).unwrap();
    let mut repo = test_repo("t");
    let supervisor = AgentBuilder::worker("supervisor").kind(mc_core::AgentKind::Supervisor).build();
    repo.agents.insert(supervisor.name.clone(), supervisor);
    state.add_repo(repo.clone()).unwrap();

    let tmux: Arc<dyn MultiplexerBackend> = Arc::new(FakeMultiplexerBackend::new());
    let cancel = CancellationToken::new();

    recover(&state, &tmux, &cancel).await;

    assert!(tmux.has_session(&repo.tmux_session, &cancel).await.unwrap());
    assert!(tmux.has_window(&repo.tmux_session, "supervisor", &cancel).await.unwrap());
}

#[tokio::test]
async fn leaves_a_live_session_untouched() {
    let tmp = tempfile::tempdir().unwrap();
    let clock: Arc<dyn mc_core::Clock> = Arc::new(FakeClock::new());
    let state = StateStore::load(tmp.path().join("state.json"), clock).unwrap();
    let repo = test_repo("t");
    state.add_repo(repo.clone()).unwrap();

    let fake = FakeMultiplexerBackend::new();
    let cancel = CancellationToken::new();
    fake.create_session(&repo.tmux_session, true, &cancel).await.unwrap();
    let tmux: Arc<dyn MultiplexerBackend> = Arc::new(fake);

    recover(&state, &tmux, &cancel).await;

    assert!(tmux.has_session(&repo.tmux_session, &cancel).await.unwrap());
}
