// SPDX-License-Identifier: MIT

use super::*;
use std::path::Path;

#[tokio::test]
async fn migrate_legacy_workspace_branch_default_impl_uses_backend_trait_methods() {
    let backend = FakeWorktreeBackend::new();
    backend.add_branch("workspace");
    let migrated = backend.migrate_legacy_workspace_branch(Path::new("/repo")).await.unwrap();
    assert!(migrated);
    assert!(backend.branch_exists(Path::new("/repo"), "workspace/default").await.unwrap());
    assert!(!backend.branch_exists(Path::new("/repo"), "workspace").await.unwrap());
}
