// SPDX-License-Identifier: MIT

use crate::test_support::test_stores;
use mc_core::test_support::{test_repo, AgentBuilder};

#[test]
fn add_repo_rejects_duplicate_names() {
    let stores = test_stores();
    stores.state.add_repo(test_repo("demo")).unwrap();
    let err = stores.state.add_repo(test_repo("demo")).unwrap_err();
    assert!(matches!(err, crate::StoreError::RepoAlreadyExists(_)));
}

#[test]
fn add_agent_requires_existing_repo() {
    let stores = test_stores();
    let agent = AgentBuilder::worker("w1").build();
    let err = stores.state.add_agent("missing", agent).unwrap_err();
    assert!(matches!(err, crate::StoreError::RepoNotFound(_)));
}

#[test]
fn add_agent_rejects_worktree_reuse_across_agents() {
    let stores = test_stores();
    stores.state.add_repo(test_repo("demo")).unwrap();
    let w1 = AgentBuilder::worker("w1").build();
    let path = w1.worktree_path.clone();
    stores.state.add_agent("demo", w1).unwrap();

    let mut w2 = AgentBuilder::worker("w2").build();
    w2.worktree_path = path;
    let err = stores.state.add_agent("demo", w2).unwrap_err();
    assert!(matches!(err, crate::StoreError::Invalid(_)));
}

#[test]
fn update_agent_applies_under_the_write_lock() {
    let stores = test_stores();
    stores.state.add_repo(test_repo("demo")).unwrap();
    stores.state.add_agent("demo", AgentBuilder::worker("w1").build()).unwrap();

    let updated = stores.state.update_agent("demo", "w1", |a| a.ready_for_cleanup = true).unwrap();
    assert!(updated.ready_for_cleanup);
    assert!(stores.state.get_agent("demo", "w1").unwrap().ready_for_cleanup);
}

#[test]
fn remove_agent_records_task_history_for_workers_only() {
    let stores = test_stores();
    stores.state.add_repo(test_repo("demo")).unwrap();
    stores.state.add_agent("demo", AgentBuilder::worker("w1").build()).unwrap();
    stores
        .state
        .add_agent("demo", AgentBuilder::worker("s1").kind(mc_core::AgentKind::Supervisor).build())
        .unwrap();

    stores.state.remove_agent("demo", "w1").unwrap();
    stores.state.remove_agent("demo", "s1").unwrap();

    let history = stores.state.get_task_history("demo", 10).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].name, "w1");
}

#[test]
fn save_then_load_round_trips_the_graph() {
    let stores = test_stores();
    stores.state.add_repo(test_repo("demo")).unwrap();
    stores.state.add_agent("demo", AgentBuilder::worker("w1").build()).unwrap();

    let path = stores.dir.path().join("state.json");
    let reloaded = crate::StateStore::load(path, stores.clock.clone()).unwrap();
    assert_eq!(reloaded.get_agent("demo", "w1").unwrap().name, "w1");
}

#[test]
fn missing_file_yields_empty_graph() {
    let dir = tempfile::TempDir::new().unwrap();
    let clock = std::sync::Arc::new(mc_core::FakeClock::new());
    let store = crate::StateStore::load(dir.path().join("nope.json"), clock).unwrap();
    assert!(store.list_repos().is_empty());
}

#[test]
fn malformed_file_fails_loudly() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, b"not json").unwrap();
    let clock = std::sync::Arc::new(mc_core::FakeClock::new());
    let err = crate::StateStore::load(path, clock).unwrap_err();
    assert!(matches!(err, crate::StoreError::Corrupt(_)));
}

#[test]
fn remove_repo_cascades_from_graph_but_not_from_disk_worktrees() {
    let stores = test_stores();
    stores.state.add_repo(test_repo("demo")).unwrap();
    stores.state.remove_repo("demo").unwrap();
    assert!(stores.state.get_repo("demo").is_err());
}
