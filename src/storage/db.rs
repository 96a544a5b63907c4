use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;

use crate::core::config;
use crate::core::AppResult;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConnection = PooledConnection<SqliteConnectionManager>;

/// How long a writer waits for a competing lock before SQLite gives up
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Create a new database connection pool
///
/// Opens (and creates, on first use) the SQLite file and its parent
/// directory, and makes sure the channel table exists before the pool is handed out.
///
/// # Arguments
///
/// * `database_path` - Path to SQLite database file
///
/// # Example
///
/// ```no_run
/// use chanbot::storage::db;
///
/// let pool = db::create_pool("channels.sqlite")?;
/// # Ok::<(), chanbot::core::AppError>(())
/// ```
pub fn create_pool(database_path: &str) -> AppResult<DbPool> {
    if let Some(parent) = Path::new(database_path).parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let manager = SqliteConnectionManager::file(database_path).with_init(|conn| conn.busy_timeout(BUSY_TIMEOUT));
    let pool = Pool::builder()
        .max_size(config::store::POOL_MAX_SIZE)
        .connection_timeout(config::store::connection_timeout())
        .build(manager)?;

    let conn = pool.get()?;
    ensure_schema(&conn)?;

    log::info!("Database ready at {}", database_path);
    Ok(pool)
}

/// Get a connection from the pool
///
/// The connection is returned to the pool when dropped.
pub fn get_connection(pool: &DbPool) -> AppResult<DbConnection> {
    Ok(pool.get()?)
}

/// Creates the channel table if it does not exist yet.
///
/// Safe to call any number of times. `AUTOINCREMENT` keeps ids monotonic:
/// an id freed by a delete is never handed out again.
pub fn ensure_schema(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS channels (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            name      TEXT NOT NULL,
            link      TEXT NOT NULL,
            thumbnail TEXT NULL
        );",
    )?;
    Ok(())
}
