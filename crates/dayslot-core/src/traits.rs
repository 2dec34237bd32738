//! Storage seam: a minimal document store keyed by path.

use async_trait::async_trait;

use crate::error::Result;

/// JSON documents addressed by slash-separated paths (see [`crate::paths`]).
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Backend name for logs.
    fn name(&self) -> &str;

    /// Read a document; `None` if it was never written.
    async fn get(&self, path: &str) -> Result<Option<serde_json::Value>>;

    /// Create or replace a document.
    async fn set(&self, path: &str, doc: serde_json::Value) -> Result<()>;

    /// Remove a document. Missing documents are not an error.
    async fn delete(&self, path: &str) -> Result<()>;

    /// All documents directly inside `collection`, ordered by path.
    async fn list(&self, collection: &str) -> Result<Vec<(String, serde_json::Value)>>;
}
