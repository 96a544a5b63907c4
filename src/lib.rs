//! Chanbot - Telegram bot serving an admin-curated channel directory
//!
//! # Module Structure
//!
//! - `core`: Configuration, errors, logging and text helpers
//! - `storage`: SQLite pool and the channel store
//! - `telegram`: Menus, the screen dispatcher and the teloxide handler tree
//! - `cli`: Command line interface

pub mod cli;
pub mod core;
pub mod storage;
pub mod telegram;

// Re-export commonly used types for convenience
pub use crate::core::{config, AppError, AppResult};
pub use crate::storage::{create_pool, get_connection, Channel, ChannelStore, DbConnection, DbPool};
pub use crate::telegram::{dispatch, schema, AppContext, Screen};
