//! Configuration values for the bot
//!
//! Read once from the environment (after `.env` has been loaded) and then
//! copied into [`crate::telegram::AppContext`] at startup.

use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

/// Database file path
/// Read from DATABASE_PATH environment variable
/// Default: channels.sqlite
pub static DATABASE_PATH: Lazy<String> =
    Lazy::new(|| env::var("DATABASE_PATH").unwrap_or_else(|_| "channels.sqlite".to_string()));

/// Log file path
/// Read from LOG_FILE_PATH environment variable
/// Default: chanbot.log
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "chanbot.log".to_string()));

/// Bot token
/// Read from BOT_TOKEN or TELOXIDE_TOKEN environment variable
pub static BOT_TOKEN: Lazy<String> = Lazy::new(|| {
    env::var("BOT_TOKEN")
        .or_else(|_| env::var("TELOXIDE_TOKEN"))
        .unwrap_or_else(|_| String::new())
});

/// Custom Bot API server URL (local telegram-bot-api instance)
/// Read from BOT_API_URL environment variable
pub static BOT_API_URL: Lazy<Option<String>> = Lazy::new(|| env::var("BOT_API_URL").ok());

/// Administrator configuration
pub mod admin {
    use once_cell::sync::Lazy;
    use std::env;

    /// Parses an administrator id, treating anything that is not a positive
    /// integer as "no administrator configured".
    pub fn parse_admin_id(raw: &str) -> Option<i64> {
        raw.trim().parse::<i64>().ok().filter(|id| *id > 0)
    }

    /// Telegram user id of the single administrator
    /// Read from ADMIN_USER_ID environment variable
    /// Defaults to 0 if not set or invalid (nobody is admin)
    pub static ADMIN_USER_ID: Lazy<i64> = Lazy::new(|| match env::var("ADMIN_USER_ID") {
        Ok(raw) => parse_admin_id(&raw).unwrap_or_else(|| {
            log::warn!("ADMIN_USER_ID={:?} is not a valid user id, admin panel is disabled", raw);
            0
        }),
        Err(_) => 0,
    });
}

/// Network configuration
pub mod network {
    use super::Duration;
    use once_cell::sync::Lazy;
    use std::env;

    /// Default timeout for Bot API requests (in seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Read from NETWORK_TIMEOUT_SECS environment variable
    pub static TIMEOUT_SECS: Lazy<u64> = Lazy::new(|| {
        env::var("NETWORK_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS)
    });

    /// Request timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(*TIMEOUT_SECS)
    }
}

/// Retry configuration
pub mod retry {
    use super::Duration;

    /// Maximum number of dispatcher restarts after a panic
    pub const MAX_DISPATCHER_RETRIES: u32 = 5;

    /// Base delay for exponential backoff between dispatcher restarts (in seconds)
    pub const BACKOFF_BASE_SECS: u64 = 2;

    /// Upper bound for a single backoff delay (in seconds)
    pub const BACKOFF_MAX_SECS: u64 = 60;

    /// How many times `getMe` is retried while the Bot API is unreachable at startup
    pub const STARTUP_MAX_RETRIES: u32 = 60;

    /// Delay between startup `getMe` attempts (in seconds)
    pub const STARTUP_RETRY_DELAY_SECS: u64 = 5;

    /// Backoff delay before restart attempt number `attempt` (1-based)
    pub fn backoff_delay(attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(16);
        let secs = BACKOFF_BASE_SECS.saturating_mul(1u64 << exp);
        Duration::from_secs(secs.min(BACKOFF_MAX_SECS))
    }
}

/// Store configuration
pub mod store {
    use super::Duration;

    /// Maximum number of pooled SQLite connections
    pub const POOL_MAX_SIZE: u32 = 4;

    /// How long to wait for a pooled connection (in seconds)
    pub const CONNECTION_TIMEOUT_SECS: u64 = 10;

    /// Pool checkout timeout duration
    pub fn connection_timeout() -> Duration {
        Duration::from_secs(CONNECTION_TIMEOUT_SECS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_admin_id_accepts_positive_ids() {
        assert_eq!(admin::parse_admin_id("123456"), Some(123456));
        assert_eq!(admin::parse_admin_id("  42 \n"), Some(42));
    }

    #[test]
    fn test_parse_admin_id_rejects_garbage() {
        assert_eq!(admin::parse_admin_id(""), None);
        assert_eq!(admin::parse_admin_id("abc"), None);
        assert_eq!(admin::parse_admin_id("0"), None);
        assert_eq!(admin::parse_admin_id("-5"), None);
    }

    #[test]
    fn test_backoff_delay_grows_and_caps() {
        assert_eq!(retry::backoff_delay(1), Duration::from_secs(2));
        assert_eq!(retry::backoff_delay(2), Duration::from_secs(4));
        assert_eq!(retry::backoff_delay(3), Duration::from_secs(8));
        assert_eq!(retry::backoff_delay(10), Duration::from_secs(retry::BACKOFF_MAX_SECS));
        assert_eq!(retry::backoff_delay(u32::MAX), Duration::from_secs(retry::BACKOFF_MAX_SECS));
    }

    #[test]
    fn test_network_timeout_positive() {
        assert!(network::timeout() > Duration::ZERO);
    }
}
