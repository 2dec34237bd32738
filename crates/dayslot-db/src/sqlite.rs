//! SQLite document store: one row per document, JSON payload.

use async_trait::async_trait;
use dayslot_core::error::{DaySlotError, Result};
use dayslot_core::paths;
use dayslot_core::traits::DocumentStore;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use std::sync::Mutex;

pub struct SqliteDocumentStore {
    conn: Mutex<Connection>,
}

fn db_err(e: impl std::fmt::Display) -> DaySlotError {
    DaySlotError::Database(e.to_string())
}

impl SqliteDocumentStore {
    /// Open or create the database file.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(db_err)?;
        // WAL for concurrent readers; ignored for :memory:
        conn.execute_batch("PRAGMA journal_mode=WAL;").ok();
        Self::with_connection(conn)
    }

    /// Private in-memory database (tests).
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory().map_err(db_err)?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().map_err(db_err)?;
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS documents (
                path TEXT PRIMARY KEY,
                collection TEXT NOT NULL,
                data TEXT NOT NULL,           -- JSON document
                updated_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents(collection);
            ",
        )
        .map_err(|e| DaySlotError::Database(format!("Migration: {e}")))?;
        Ok(())
    }

    /// Number of stored documents.
    pub fn count(&self) -> usize {
        let Ok(conn) = self.conn.lock() else {
            return 0;
        };
        conn.query_row("SELECT COUNT(*) FROM documents", [], |r| r.get::<_, i64>(0))
            .unwrap_or(0) as usize
    }
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn get(&self, path: &str) -> Result<Option<serde_json::Value>> {
        let conn = self.conn.lock().map_err(db_err)?;
        let raw: Option<String> = conn
            .query_row(
                "SELECT data FROM documents WHERE path = ?1",
                params![path],
                |row| row.get(0),
            )
            .optional()
            .map_err(db_err)?;
        match raw {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn set(&self, path: &str, doc: serde_json::Value) -> Result<()> {
        let conn = self.conn.lock().map_err(db_err)?;
        conn.execute(
            "INSERT OR REPLACE INTO documents (path, collection, data, updated_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                path,
                paths::collection_of(path),
                doc.to_string(),
                chrono::Utc::now().to_rfc3339(),
            ],
        )
        .map_err(db_err)?;
        tracing::debug!("💾 Saved document {path}");
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let conn = self.conn.lock().map_err(db_err)?;
        conn.execute("DELETE FROM documents WHERE path = ?1", params![path])
            .map_err(db_err)?;
        Ok(())
    }

    async fn list(&self, collection: &str) -> Result<Vec<(String, serde_json::Value)>> {
        let conn = self.conn.lock().map_err(db_err)?;
        let mut stmt = conn
            .prepare("SELECT path, data FROM documents WHERE collection = ?1 ORDER BY path")
            .map_err(db_err)?;
        let rows = stmt
            .query_map(params![collection], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })
            .map_err(db_err)?;

        let mut docs = Vec::new();
        for row in rows {
            let (path, raw) = row.map_err(db_err)?;
            match serde_json::from_str(&raw) {
                Ok(value) => docs.push((path, value)),
                Err(e) => tracing::warn!("⚠️ Skipping unreadable document {path}: {e}"),
            }
        }
        Ok(docs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_set_get_replace() {
        let store = SqliteDocumentStore::open_in_memory().unwrap();
        assert!(store.get("users/1/config/main").await.unwrap().is_none());

        store.set("users/1/config/main", json!({"start_hour": 7})).await.unwrap();
        store.set("users/1/config/main", json!({"start_hour": 8})).await.unwrap();

        let doc = store.get("users/1/config/main").await.unwrap().unwrap();
        assert_eq!(doc["start_hour"], 8);
        assert_eq!(store.count(), 1);
    }

    #[tokio::test]
    async fn test_list_only_direct_children() {
        let store = SqliteDocumentStore::open_in_memory().unwrap();
        store.set("timers/b", json!(2)).await.unwrap();
        store.set("timers/a", json!(1)).await.unwrap();
        store.set("users/1/config/main", json!({})).await.unwrap();

        let timers = store.list("timers").await.unwrap();
        let names: Vec<&str> = timers.iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(names, vec!["timers/a", "timers/b"]);
        assert!(store.list("users").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete() {
        let store = SqliteDocumentStore::open_in_memory().unwrap();
        store.set("timers/a", json!(1)).await.unwrap();
        store.delete("timers/a").await.unwrap();
        store.delete("timers/missing").await.unwrap();
        assert!(store.get("timers/a").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docs.db");
        {
            let store = SqliteDocumentStore::open(&path).unwrap();
            store.set("users/9/schedules/2026-03-01", json!({"date": "2026-03-01"})).await.unwrap();
        }
        let store = SqliteDocumentStore::open(&path).unwrap();
        let doc = store.get("users/9/schedules/2026-03-01").await.unwrap().unwrap();
        assert_eq!(doc["date"], "2026-03-01");
    }
}
