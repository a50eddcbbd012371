//! Document store seam
//!
//! The invitation and membership services never talk to a database client
//! directly. They hold an injected `Arc<S: DocumentStore>` and address data
//! through [`StorePath`]s, the same way a hierarchical cloud document
//! database is addressed:
//!
//! ```text
//! invitations/{code}            -> invitation record
//! invitations/{code}/status     -> single status field
//! users/{userId}/isAdmin        -> admin flag
//! users/{userId}/roomAccess/{roomId} -> per-room membership flag
//! ```
//!
//! [`MemoryDocumentStore`] implements the same tree semantics in process.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

mod error;
mod memory;
mod path;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryDocumentStore;
pub use path::StorePath;

/// Single-shot view of the value stored at a path
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    path: StorePath,
    value: Option<Value>,
}

impl Snapshot {
    pub fn new(path: StorePath, value: Option<Value>) -> Self {
        Self { path, value }
    }

    pub fn path(&self) -> &StorePath {
        &self.path
    }

    /// Whether anything is stored at this path
    pub fn exists(&self) -> bool {
        self.value.is_some()
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn into_value(self) -> Option<Value> {
        self.value
    }

    /// Decode the stored value, `None` when nothing is stored
    pub fn deserialize<T: DeserializeOwned>(&self) -> StoreResult<Option<T>> {
        match &self.value {
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
            None => Ok(None),
        }
    }

    /// Child entries when the stored value is an object
    pub fn children(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.value
            .as_ref()
            .and_then(Value::as_object)
            .into_iter()
            .flat_map(|map| map.iter().map(|(k, v)| (k.as_str(), v)))
    }
}

/// Hierarchical key-value document store
///
/// Writes are last-writer-wins per path. Implementations must be shareable
/// across tasks; there is no cancellation, an issued write runs to completion.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Replace the subtree at `path`, creating intermediate objects
    async fn set(&self, path: &StorePath, value: Value) -> StoreResult<()>;

    /// Delete the subtree at `path`. Deleting a missing path succeeds.
    async fn remove(&self, path: &StorePath) -> StoreResult<()>;

    /// Read the subtree at `path`
    async fn read(&self, path: &StorePath) -> StoreResult<Snapshot>;

    /// Write only if nothing is stored at `path`, returning whether the write happened
    ///
    /// The default is a read followed by a write and is not atomic; backends
    /// with a transaction primitive should override it.
    async fn set_if_absent(&self, path: &StorePath, value: Value) -> StoreResult<bool> {
        if self.read(path).await?.exists() {
            return Ok(false);
        }
        self.set(path, value).await?;
        Ok(true)
    }

    /// Write `record/field` only if something is stored at `record`
    ///
    /// Returns whether the write happened. A missing record is never
    /// recreated as a stub holding just `field`. The default reads then
    /// writes and is not atomic.
    async fn update_if_present(&self, record: &StorePath, field: &str, value: Value) -> StoreResult<bool> {
        let path = record.clone().child(field)?;
        if !self.read(record).await?.exists() {
            return Ok(false);
        }
        self.set(&path, value).await?;
        Ok(true)
    }
}
