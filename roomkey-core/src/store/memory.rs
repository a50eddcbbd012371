//! In-process document tree
//!
//! Mirrors the hierarchical semantics of the remote store: setting a deep
//! path creates parents, removing the last child of an object removes the
//! object, and `null` is never stored.

use super::{DocumentStore, Snapshot, StorePath, StoreResult};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::trace;

/// Document store backed by a JSON tree behind an async lock
#[derive(Clone, Default)]
pub struct MemoryDocumentStore {
    root: Arc<RwLock<Map<String, Value>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing JSON object, e.g. a fixture export
    pub fn from_json(root: Value) -> Self {
        let root = match root {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self { root: Arc::new(RwLock::new(root)) }
    }

    /// Copy of the whole tree
    pub async fn dump(&self) -> Value {
        Value::Object(self.root.read().await.clone())
    }
}

fn lookup<'a>(root: &'a Map<String, Value>, path: &StorePath) -> Option<&'a Value> {
    let (first, rest) = path.segments().split_first()?;
    let mut node = root.get(first)?;
    for segment in rest {
        node = node.as_object()?.get(segment)?;
    }
    Some(node)
}

fn insert(root: &mut Map<String, Value>, path: &StorePath, value: Value) {
    let segments = path.segments();
    let Some((last, parents)) = segments.split_last() else {
        return;
    };

    let mut node = root;
    for segment in parents {
        let entry = node
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        node = match entry {
            Value::Object(map) => map,
            _ => return,
        };
    }
    node.insert(last.clone(), value);
}

/// Remove `segments` below `node`; returns true when `node` became empty
fn delete(node: &mut Map<String, Value>, segments: &[String]) -> bool {
    match segments {
        [] => false,
        [last] => {
            node.remove(last);
            node.is_empty()
        }
        [first, rest @ ..] => {
            let emptied = match node.get_mut(first) {
                Some(Value::Object(child)) => delete(child, rest),
                _ => false,
            };
            if emptied {
                node.remove(first);
            }
            node.is_empty()
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn set(&self, path: &StorePath, value: Value) -> StoreResult<()> {
        trace!(%path, "memory store set");
        let mut root = self.root.write().await;
        if value.is_null() {
            delete(&mut root, path.segments());
        } else {
            insert(&mut root, path, value);
        }
        Ok(())
    }

    async fn remove(&self, path: &StorePath) -> StoreResult<()> {
        trace!(%path, "memory store remove");
        let mut root = self.root.write().await;
        delete(&mut root, path.segments());
        Ok(())
    }

    async fn read(&self, path: &StorePath) -> StoreResult<Snapshot> {
        let root = self.root.read().await;
        Ok(Snapshot::new(path.clone(), lookup(&root, path).cloned()))
    }

    async fn set_if_absent(&self, path: &StorePath, value: Value) -> StoreResult<bool> {
        let mut root = self.root.write().await;
        if lookup(&root, path).is_some() {
            return Ok(false);
        }
        insert(&mut root, path, value);
        Ok(true)
    }

    async fn update_if_present(&self, record: &StorePath, field: &str, value: Value) -> StoreResult<bool> {
        let path = record.clone().child(field)?;
        let mut root = self.root.write().await;
        if lookup(&root, record).is_none() {
            return Ok(false);
        }
        if value.is_null() {
            delete(&mut root, path.segments());
        } else {
            insert(&mut root, &path, value);
        }
        Ok(true)
    }
}
