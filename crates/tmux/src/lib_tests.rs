// SPDX-License-Identifier: MIT

use super::*;

#[tokio::test]
async fn has_window_never_treats_a_prefix_as_a_match() {
    let backend = fake::FakeMultiplexerBackend::new();
    let cancel = CancellationToken::new();
    backend.create_session("s1", true, &cancel).await.unwrap();
    backend.create_window("s1", "worker-1", &cancel).await.unwrap();
    backend.create_window("s1", "worker-10", &cancel).await.unwrap();

    assert!(backend.has_window("s1", "worker-1", &cancel).await.unwrap());
    assert!(backend.has_window("s1", "worker-10", &cancel).await.unwrap());
    assert!(!backend.has_window("s1", "worker", &cancel).await.unwrap());
    assert!(!backend.has_window("s1", "worker-100", &cancel).await.unwrap());
}
