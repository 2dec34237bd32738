//! In-memory document store.

use async_trait::async_trait;
use dayslot_core::error::{DaySlotError, Result};
use dayslot_core::paths;
use dayslot_core::traits::DocumentStore;
use std::collections::BTreeMap;
use std::sync::Mutex;

#[derive(Default)]
pub struct MemoryDocumentStore {
    docs: Mutex<BTreeMap<String, serde_json::Value>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.docs.lock().map(|d| d.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(e: std::sync::PoisonError<T>) -> DaySlotError {
    DaySlotError::Database(format!("Lock: {e}"))
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn get(&self, path: &str) -> Result<Option<serde_json::Value>> {
        Ok(self.docs.lock().map_err(poisoned)?.get(path).cloned())
    }

    async fn set(&self, path: &str, doc: serde_json::Value) -> Result<()> {
        self.docs
            .lock()
            .map_err(poisoned)?
            .insert(path.to_string(), doc);
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<()> {
        self.docs.lock().map_err(poisoned)?.remove(path);
        Ok(())
    }

    async fn list(&self, collection: &str) -> Result<Vec<(String, serde_json::Value)>> {
        let docs = self.docs.lock().map_err(poisoned)?;
        Ok(docs
            .iter()
            .filter(|(path, _)| paths::collection_of(path) == collection)
            .map(|(path, doc)| (path.clone(), doc.clone()))
            .collect())
    }
}
