//! # DaySlot DB
//! Document store backends and the typed per-user repository.
//!
//! `DATABASE_URL` forms:
//! - `sqlite://~/.dayslot/dayslot.db` (or `sqlite:path`, or a bare path)
//! - `memory://` / `:memory:` for a throwaway in-process store

pub mod memory;
pub mod repo;
pub mod sqlite;

use std::path::PathBuf;
use std::sync::Arc;

use dayslot_core::error::{DaySlotError, Result};
use dayslot_core::traits::DocumentStore;

pub use memory::MemoryDocumentStore;
pub use repo::UserStore;
pub use sqlite::SqliteDocumentStore;

/// Where a database URL points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    Memory,
    Sqlite(PathBuf),
}

/// Interpret a database URL.
pub fn parse_url(url: &str) -> Result<StoreLocation> {
    let url = url.trim();
    if url == "memory://" || url == ":memory:" {
        return Ok(StoreLocation::Memory);
    }
    if let Some(path) = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
    {
        return sqlite_location(path);
    }
    if url.contains("://") {
        return Err(DaySlotError::Config(format!(
            "Unsupported database URL '{url}' (expected sqlite://PATH or memory://)"
        )));
    }
    sqlite_location(url)
}

fn sqlite_location(path: &str) -> Result<StoreLocation> {
    if path.is_empty() {
        return Err(DaySlotError::Config("database path is empty".into()));
    }
    Ok(StoreLocation::Sqlite(PathBuf::from(
        shellexpand::tilde(path).to_string(),
    )))
}

/// Open the store a database URL points to.
pub fn open_store(url: &str) -> Result<Arc<dyn DocumentStore>> {
    match parse_url(url)? {
        StoreLocation::Memory => {
            tracing::warn!("⚠️ Using in-memory document store: data is lost on restart");
            Ok(Arc::new(MemoryDocumentStore::new()))
        }
        StoreLocation::Sqlite(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            let store = SqliteDocumentStore::open(&path)?;
            tracing::info!("🗄️ Document store: {}", path.display());
            Ok(Arc::new(store))
        }
    }
}
