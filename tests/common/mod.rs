//! Common test utilities
//!
//! This module is shared across all integration tests

#![allow(dead_code, clippy::expect_used, clippy::unwrap_used)]

use chanbot::storage::ChannelStore;
use chanbot::telegram::{dispatch, AppContext, Inbound, Screen, Transition};
use chanbot::telegram::{CallbackAction, Command};
use tempfile::TempDir;

/// Administrator id configured for every test environment
pub const ADMIN_ID: i64 = 424242;

/// An ordinary user
pub const USER_ID: i64 = 777;

/// Complete test environment: a fresh SQLite file plus the context the
/// dispatcher runs against. Tracks the screen per caller the way the
/// dialogue storage does in production.
pub struct TestEnvironment {
    /// Keeps the database directory alive
    pub dir: TempDir,
    pub ctx: AppContext,
    pub screen: Screen,
}

impl TestEnvironment {
    pub fn new() -> anyhow::Result<Self> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("channels.sqlite");
        let store = ChannelStore::open(path.to_str().ok_or_else(|| anyhow::anyhow!("non-utf8 temp path"))?)?;
        Ok(Self {
            dir,
            ctx: AppContext::new(store, ADMIN_ID),
            screen: Screen::Main,
        })
    }

    pub fn store(&self) -> &ChannelStore {
        &self.ctx.store
    }

    /// Feeds one event and moves to the resulting screen
    pub fn send(&mut self, caller_id: i64, event: Inbound) -> Transition {
        let transition = dispatch(&self.ctx, caller_id, self.screen, event);
        self.screen = transition.next;
        transition
    }

    pub fn press(&mut self, caller_id: i64, action: CallbackAction) -> Transition {
        self.send(caller_id, Inbound::Button(action.token().to_string()))
    }

    pub fn type_text(&mut self, caller_id: i64, text: &str) -> Transition {
        self.send(caller_id, Inbound::Text(text.to_string()))
    }

    pub fn command(&mut self, caller_id: i64, command: Command) -> Transition {
        self.send(caller_id, Inbound::Command(command))
    }

    pub fn ids(&self) -> Vec<i64> {
        self.store()
            .list_channels()
            .expect("list_channels failed")
            .into_iter()
            .map(|c| c.id)
            .collect()
    }
}
