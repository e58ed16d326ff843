// SPDX-License-Identifier: MIT

use super::*;

#[test]
fn failure_reason_present_means_failed() {
    assert_eq!(
        TaskHistoryEntry::derive_status(&Some("oom".to_string())),
        TaskHistoryStatus::Failed
    );
}

#[test]
fn no_failure_reason_means_unknown() {
    assert_eq!(TaskHistoryEntry::derive_status(&None), TaskHistoryStatus::Unknown);
}

#[test]
fn from_removed_agent_infers_branch_from_worktree_directory_name() {
    let now = chrono::DateTime::UNIX_EPOCH;
    let mut agent = Agent::new(
        "worker-a",
        crate::AgentKind::Worker,
        std::path::PathBuf::from("/worktrees/repo/feature-x"),
        "win",
        "do the thing",
        now,
    );
    agent.failure_reason = Some("oom".to_string());

    let entry = TaskHistoryEntry::from_removed_agent(&agent, now);
    assert_eq!(entry.branch.as_deref(), Some("feature-x"));
    assert_eq!(entry.status, TaskHistoryStatus::Failed);
    assert_eq!(entry.created_at, now);
}
