//! Store wrapper that fails on demand
//!
//! Wraps any DocumentStore; while a failure switch is on, the matching
//! operations return `StoreError::Backend` without reaching the inner store.

use crate::store::{DocumentStore, Snapshot, StoreError, StorePath, StoreResult};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

pub struct FlakyStore<S> {
    inner: S,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    rejected: AtomicUsize,
}

impl<S> FlakyStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            rejected: AtomicUsize::new(0),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Covers `set`, `remove`, `set_if_absent` and `update_if_present`
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Operations refused so far
    pub fn rejected(&self) -> usize {
        self.rejected.load(Ordering::SeqCst)
    }

    fn check(&self, switch: &AtomicBool, op: &str, path: &StorePath) -> StoreResult<()> {
        if switch.load(Ordering::SeqCst) {
            self.rejected.fetch_add(1, Ordering::SeqCst);
            return Err(StoreError::Backend(format!("injected {} failure at {}", op, path)));
        }
        Ok(())
    }
}

#[async_trait]
impl<S: DocumentStore> DocumentStore for FlakyStore<S> {
    async fn set(&self, path: &StorePath, value: Value) -> StoreResult<()> {
        self.check(&self.fail_writes, "set", path)?;
        self.inner.set(path, value).await
    }

    async fn remove(&self, path: &StorePath) -> StoreResult<()> {
        self.check(&self.fail_writes, "remove", path)?;
        self.inner.remove(path).await
    }

    async fn read(&self, path: &StorePath) -> StoreResult<Snapshot> {
        self.check(&self.fail_reads, "read", path)?;
        self.inner.read(path).await
    }

    async fn set_if_absent(&self, path: &StorePath, value: Value) -> StoreResult<bool> {
        self.check(&self.fail_writes, "set_if_absent", path)?;
        self.inner.set_if_absent(path, value).await
    }

    async fn update_if_present(&self, record: &StorePath, field: &str, value: Value) -> StoreResult<bool> {
        self.check(&self.fail_writes, "update_if_present", record)?;
        self.inner.update_if_present(record, field, value).await
    }
}
