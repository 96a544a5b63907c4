//! Channel directory persistence.
//!
//! Records are created only by the admin "add channel" flow and destroyed
//! only by the "remove channel" flow; there is no update path.

use rusqlite::{params, Connection};
use serde::Serialize;
use std::sync::Arc;

use crate::core::{AppError, AppResult};
use crate::storage::db::{self, DbPool};

/// A channel row from the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Channel {
    pub id: i64,
    pub name: String,
    pub link: String,
    /// Persisted for future use, menus do not show it.
    pub thumbnail: Option<String>,
}

fn parse_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Channel> {
    Ok(Channel {
        id: row.get(0)?,
        name: row.get(1)?,
        link: row.get(2)?,
        thumbnail: row.get(3)?,
    })
}

/// All channels ordered by id (insertion order). Empty table yields an empty vec.
pub fn list_channels(conn: &Connection) -> AppResult<Vec<Channel>> {
    let mut stmt = conn.prepare("SELECT id, name, link, thumbnail FROM channels ORDER BY id ASC")?;
    let rows = stmt.query_map([], parse_row)?;

    let mut channels = Vec::new();
    for row in rows {
        channels.push(row?);
    }
    Ok(channels)
}

/// Insert a channel and return its newly assigned id.
///
/// `name` and `link` are trimmed and must be non-empty. An empty or blank
/// `thumbnail` is stored as NULL.
pub fn add_channel(conn: &Connection, name: &str, link: &str, thumbnail: Option<&str>) -> AppResult<i64> {
    let name = name.trim();
    let link = link.trim();
    if name.is_empty() {
        return Err(AppError::Validation("channel name is empty".to_string()));
    }
    if link.is_empty() {
        return Err(AppError::Validation("channel link is empty".to_string()));
    }
    let thumbnail = thumbnail.map(str::trim).filter(|t| !t.is_empty());

    conn.execute(
        "INSERT INTO channels (name, link, thumbnail) VALUES (?1, ?2, ?3)",
        params![name, link, thumbnail],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Delete the channel with `id`. Returns whether a row existed.
///
/// Deleting a missing id is not an error.
pub fn remove_channel(conn: &Connection, id: i64) -> AppResult<bool> {
    let affected = conn.execute("DELETE FROM channels WHERE id = ?1", params![id])?;
    Ok(affected > 0)
}

/// Shared handle to the channel table.
///
/// Each operation checks a connection out of the pool for the duration of a
/// single statement; nothing spans calls.
#[derive(Clone)]
pub struct ChannelStore {
    pool: Arc<DbPool>,
}

impl ChannelStore {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    /// Opens (or creates) the store file and its schema.
    pub fn open(database_path: &str) -> AppResult<Self> {
        Ok(Self::new(Arc::new(db::create_pool(database_path)?)))
    }

    pub fn pool(&self) -> Arc<DbPool> {
        Arc::clone(&self.pool)
    }

    pub fn ensure_schema(&self) -> AppResult<()> {
        let conn = db::get_connection(&self.pool)?;
        db::ensure_schema(&conn)
    }

    pub fn list_channels(&self) -> AppResult<Vec<Channel>> {
        let conn = db::get_connection(&self.pool)?;
        list_channels(&conn)
    }

    pub fn add_channel(&self, name: &str, link: &str, thumbnail: Option<&str>) -> AppResult<i64> {
        let conn = db::get_connection(&self.pool)?;
        let id = add_channel(&conn, name, link, thumbnail)?;
        log::info!("Channel added: id={} name={:?}", id, name.trim());
        Ok(id)
    }

    pub fn remove_channel(&self, id: i64) -> AppResult<bool> {
        let conn = db::get_connection(&self.pool)?;
        let existed = remove_channel(&conn, id)?;
        if existed {
            log::info!("Channel removed: id={}", id);
        } else {
            log::info!("Channel remove requested for missing id={}, nothing to do", id);
        }
        Ok(existed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn make_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        db::ensure_schema(&conn).unwrap();
        conn
    }

    fn ids(conn: &Connection) -> Vec<i64> {
        list_channels(conn).unwrap().into_iter().map(|c| c.id).collect()
    }

    // ── add_channel ──────────────────────────────────────────────────────────

    #[test]
    fn add_returns_strictly_increasing_ids() {
        let conn = make_conn();
        let mut last = 0;
        for i in 0..20 {
            let id = add_channel(&conn, &format!("ch{}", i), "https://t.me/x", None).unwrap();
            assert!(id > last, "id {} must be greater than {}", id, last);
            last = id;
        }
    }

    #[test]
    fn add_into_empty_store_gets_id_one() {
        let conn = make_conn();
        let id = add_channel(&conn, "News", "https://t.me/news", Some("")).unwrap();
        assert_eq!(id, 1);

        let channels = list_channels(&conn).unwrap();
        assert_eq!(
            channels,
            vec![Channel {
                id: 1,
                name: "News".to_string(),
                link: "https://t.me/news".to_string(),
                thumbnail: None,
            }]
        );
    }

    #[test]
    fn add_rejects_empty_name_or_link() {
        let conn = make_conn();
        assert!(matches!(
            add_channel(&conn, "", "https://t.me/x", None),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            add_channel(&conn, "   ", "https://t.me/x", None),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(add_channel(&conn, "x", "", None), Err(AppError::Validation(_))));
        assert!(list_channels(&conn).unwrap().is_empty());
    }

    #[test]
    fn add_allows_duplicate_names_and_links() {
        let conn = make_conn();
        let a = add_channel(&conn, "Dup", "https://t.me/dup", None).unwrap();
        let b = add_channel(&conn, "Dup", "https://t.me/dup", None).unwrap();
        assert_ne!(a, b);
        assert_eq!(list_channels(&conn).unwrap().len(), 2);
    }

    #[test]
    fn add_keeps_thumbnail() {
        let conn = make_conn();
        add_channel(&conn, "Pics", "https://t.me/pics", Some(" https://img.example/p.png ")).unwrap();
        let channel = &list_channels(&conn).unwrap()[0];
        assert_eq!(channel.thumbnail.as_deref(), Some("https://img.example/p.png"));
    }

    // ── remove_channel ───────────────────────────────────────────────────────

    #[test]
    fn remove_middle_keeps_order() {
        let conn = make_conn();
        for name in ["a", "b", "c"] {
            add_channel(&conn, name, "https://t.me/x", None).unwrap();
        }
        assert_eq!(ids(&conn), vec![1, 2, 3]);

        remove_channel(&conn, 2).unwrap();
        assert_eq!(ids(&conn), vec![1, 3]);
    }

    #[test]
    fn remove_is_idempotent() {
        let conn = make_conn();
        add_channel(&conn, "a", "https://t.me/a", None).unwrap();
        add_channel(&conn, "b", "https://t.me/b", None).unwrap();

        assert!(remove_channel(&conn, 1).unwrap());
        let after_first = list_channels(&conn).unwrap();
        assert!(!remove_channel(&conn, 1).unwrap());
        assert_eq!(list_channels(&conn).unwrap(), after_first);
    }

    #[test]
    fn remove_missing_id_is_not_an_error() {
        let conn = make_conn();
        assert!(!remove_channel(&conn, 999).unwrap());
    }

    #[test]
    fn ids_are_never_reused_after_delete() {
        let conn = make_conn();
        add_channel(&conn, "a", "https://t.me/a", None).unwrap();
        let b = add_channel(&conn, "b", "https://t.me/b", None).unwrap();
        remove_channel(&conn, b).unwrap();

        let c = add_channel(&conn, "c", "https://t.me/c", None).unwrap();
        assert!(c > b, "id {} was reused", c);
    }

    #[test]
    fn list_after_adds_and_removes_returns_survivors() {
        let conn = make_conn();
        for i in 1..=6 {
            add_channel(&conn, &format!("ch{}", i), "https://t.me/x", None).unwrap();
        }
        for id in [2, 5, 6, 42] {
            remove_channel(&conn, id).unwrap();
        }
        assert_eq!(ids(&conn), vec![1, 3, 4]);
    }

    // ── ChannelStore ─────────────────────────────────────────────────────────

    #[test]
    fn store_roundtrip_through_pool() {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let path = dir.path().join("channels.sqlite");
        let store = ChannelStore::open(path.to_str().unwrap()).unwrap();

        store.ensure_schema().unwrap();
        assert!(store.list_channels().unwrap().is_empty());

        let id = store.add_channel("News", "https://t.me/news", None).unwrap();
        assert_eq!(id, 1);
        assert!(store.remove_channel(id).unwrap());
        assert!(!store.remove_channel(id).unwrap());
        assert!(store.list_channels().unwrap().is_empty());
    }
}
