// SPDX-License-Identifier: MIT

//! Test helpers for building stores backed by a temp directory and a fake clock.

use crate::{MessageStore, StateStore};
use mc_core::FakeClock;
use std::sync::Arc;
use tempfile::TempDir;

pub struct TestStores {
    pub dir: TempDir,
    pub clock: Arc<FakeClock>,
    pub state: StateStore,
    pub messages: MessageStore,
}

pub fn test_stores() -> TestStores {
    let dir = TempDir::new().expect("tempdir");
    let clock = Arc::new(FakeClock::new());
    let state = StateStore::load(dir.path().join("state.json"), clock.clone()).expect("load state store");
    let messages = MessageStore::new(dir.path().join("messages"), clock.clone());
    TestStores { dir, clock, state, messages }
}
