// SPDX-License-Identifier: MIT

use super::*;
use std::str::FromStr;
use yare::parameterized;

#[parameterized(
    worker = { AgentKind::Worker, true },
    workspace = { AgentKind::Workspace, true },
    supervisor = { AgentKind::Supervisor, false },
    merge_queue = { AgentKind::MergeQueue, false },
    review = { AgentKind::Review, false },
)]
fn worktree_ownership_matches_kind(kind: AgentKind, owns: bool) {
    assert_eq!(kind.owns_dedicated_worktree(), owns);
}

#[test]
fn kind_round_trips_through_display_and_from_str() {
    for kind in [
        AgentKind::Supervisor,
        AgentKind::MergeQueue,
        AgentKind::Worker,
        AgentKind::Workspace,
        AgentKind::Review,
    ] {
        let s = kind.to_string();
        assert_eq!(AgentKind::from_str(&s).unwrap(), kind);
    }
}

#[test]
fn unknown_kind_is_invalid_argument() {
    let err = AgentKind::from_str("ghost").unwrap_err();
    assert_eq!(err.kind(), crate::ErrorKind::InvalidArgument);
}

#[test]
fn new_agent_starts_mutable_with_no_summary() {
    let now = Utc::now();
    let agent = Agent::new("w", AgentKind::Worker, PathBuf::from("/wt/w"), "w", "fix bug", now);
    assert!(agent.is_mutable());
    assert_eq!(agent.created_at, agent.last_activity_at);
    assert!(agent.completion_summary.is_none());
    assert!(agent.failure_reason.is_none());
}

#[test]
fn ready_for_cleanup_makes_agent_immutable() {
    let mut agent =
        Agent::new("w", AgentKind::Worker, PathBuf::from("/wt/w"), "w", "fix", Utc::now());
    agent.ready_for_cleanup = true;
    assert!(!agent.is_mutable());
}
