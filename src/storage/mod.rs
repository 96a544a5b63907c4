//! Database and channel directory storage

pub mod channels;
pub mod db;

// Re-exports for convenience
pub use channels::{Channel, ChannelStore};
pub use db::{create_pool, get_connection, DbConnection, DbPool};
