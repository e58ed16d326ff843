// SPDX-License-Identifier: MIT

use super::*;
use yare::parameterized;

fn clean() -> RefreshPrecondition {
    RefreshPrecondition {
        detached_head: false,
        mid_rebase: false,
        mid_merge: false,
        on_default_branch: false,
        up_to_date: false,
    }
}

#[test]
fn nothing_skips_a_clean_feature_branch() {
    assert!(should_skip(clean()).is_none());
}

#[parameterized(
    detached = { RefreshPrecondition { detached_head: true, ..clean() }, RefreshSkipReason::DetachedHead },
    mid_rebase = { RefreshPrecondition { mid_rebase: true, ..clean() }, RefreshSkipReason::MidRebase },
    mid_merge = { RefreshPrecondition { mid_merge: true, ..clean() }, RefreshSkipReason::MidMerge },
    default_branch = { RefreshPrecondition { on_default_branch: true, ..clean() }, RefreshSkipReason::OnDefaultBranch },
    up_to_date = { RefreshPrecondition { up_to_date: true, ..clean() }, RefreshSkipReason::AlreadyUpToDate },
)]
fn each_condition_skips_with_its_reason(pre: RefreshPrecondition, expected: RefreshSkipReason) {
    assert_eq!(should_skip(pre), Some(expected));
}

#[test]
fn mid_rebase_wins_over_plain_detached_head() {
    // A mid-rebase checkout is also a detached HEAD in real git; the more
    // specific reason must win or MidRebase is never reported.
    let pre = RefreshPrecondition {
        detached_head: true,
        mid_rebase: true,
        mid_merge: true,
        on_default_branch: true,
        up_to_date: true,
    };
    assert_eq!(should_skip(pre), Some(RefreshSkipReason::MidRebase));
}

#[test]
fn detached_head_wins_when_not_mid_rebase_or_merge() {
    let pre = RefreshPrecondition {
        detached_head: true,
        mid_rebase: false,
        mid_merge: false,
        on_default_branch: true,
        up_to_date: true,
    };
    assert_eq!(should_skip(pre), Some(RefreshSkipReason::DetachedHead));
}

#[test]
fn refresh_result_reports_conflicts() {
    let mut result = RefreshResult::default();
    assert!(!result.has_conflicts());
    result.conflicts.insert("src/lib.rs".to_string());
    assert!(result.has_conflicts());
}
