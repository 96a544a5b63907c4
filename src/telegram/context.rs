//! Application context handed to every handler invocation.

use crate::core::{AppError, AppResult};
use crate::storage::ChannelStore;

/// Everything a handler needs, built once at startup.
#[derive(Clone)]
pub struct AppContext {
    pub store: ChannelStore,
    /// Telegram user id of the administrator, 0 when none is configured
    admin_id: i64,
}

impl AppContext {
    pub fn new(store: ChannelStore, admin_id: i64) -> Self {
        if admin_id == 0 {
            log::warn!("No administrator configured, the admin panel is unreachable");
        }
        Self { store, admin_id }
    }

    /// Compared on every call, never cached per session.
    pub fn is_admin(&self, caller_id: i64) -> bool {
        self.admin_id != 0 && caller_id == self.admin_id
    }

    pub fn require_admin(&self, caller_id: i64) -> AppResult<()> {
        if self.is_admin(caller_id) {
            Ok(())
        } else {
            Err(AppError::AccessDenied)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, ChannelStore) {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let store = ChannelStore::open(dir.path().join("c.sqlite").to_str().unwrap()).unwrap();
        (dir, store)
    }

    #[test]
    fn only_configured_admin_is_admin() {
        let (_dir, store) = store();
        let ctx = AppContext::new(store, 42);
        assert!(ctx.is_admin(42));
        assert!(!ctx.is_admin(43));
        assert!(ctx.require_admin(42).is_ok());
        assert!(matches!(ctx.require_admin(7), Err(AppError::AccessDenied)));
    }

    #[test]
    fn nobody_is_admin_when_unconfigured() {
        let (_dir, store) = store();
        let ctx = AppContext::new(store, 0);
        assert!(!ctx.is_admin(0));
        assert!(!ctx.is_admin(42));
    }
}
