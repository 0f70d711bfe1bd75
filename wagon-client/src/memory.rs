//! In-process document store
//!
//! Holds the whole document tree in memory and follows the remote store's
//! path semantics: writing `null` or deleting removes the node, and objects
//! left empty disappear with their last child. Failure injection lets tests
//! reproduce a flaky network deterministically.

use crate::store::RemoteStore;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

#[derive(Debug, Default)]
pub struct MemoryStore {
    root: Mutex<Value>,
    offline: AtomicBool,
    fail_reads: AtomicUsize,
    fail_writes: AtomicUsize,
    reads: AtomicUsize,
    writes: AtomicUsize,
    deletes: AtomicUsize,
}

fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Consume one unit of an injected failure budget
fn take_failure(budget: &AtomicUsize) -> bool {
    budget
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call fail until switched back
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Fail the next `n` reads
    pub fn fail_next_reads(&self, n: usize) {
        self.fail_reads.store(n, Ordering::SeqCst);
    }

    /// Fail the next `n` writes and deletes
    pub fn fail_next_writes(&self, n: usize) {
        self.fail_writes.store(n, Ordering::SeqCst);
    }

    /// Synchronous read that bypasses failure injection
    pub fn get(&self, path: &str) -> Option<Value> {
        let root = self.root.lock();
        let mut node = &*root;
        for segment in segments(path) {
            node = node.as_object()?.get(segment)?;
        }
        (!node.is_null()).then(|| node.clone())
    }

    /// Synchronous write that bypasses failure injection
    pub fn set(&self, path: &str, value: Value) {
        let mut root = self.root.lock();
        Self::put(&mut *root, &segments(path), value);
    }

    /// Synchronous delete that bypasses failure injection
    pub fn remove(&self, path: &str) {
        self.set(path, Value::Null);
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn delete_count(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    fn put(node: &mut Value, segments: &[&str], value: Value) {
        let Some((head, rest)) = segments.split_first() else {
            *node = value;
            return;
        };

        if !node.is_object() {
            if value.is_null() {
                return;
            }
            *node = Value::Object(Map::new());
        }
        let Some(map) = node.as_object_mut() else {
            return;
        };

        if rest.is_empty() {
            if value.is_null() {
                map.remove(*head);
            } else {
                map.insert((*head).to_string(), value);
            }
        } else {
            let child = map.entry((*head).to_string()).or_insert(Value::Null);
            Self::put(child, rest, value);
            if child.is_null() || child.as_object().is_some_and(Map::is_empty) {
                map.remove(*head);
            }
        }

        if map.is_empty() {
            *node = Value::Null;
        }
    }

    fn unavailable(&self, budget: &AtomicUsize) -> bool {
        self.offline.load(Ordering::SeqCst) || take_failure(budget)
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn read(&self, path: &str) -> Option<Value> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.unavailable(&self.fail_reads) {
            tracing::warn!(path = %path, "Store read failed (injected)");
            return None;
        }
        self.get(path)
    }

    async fn write(&self, path: &str, value: &Value) -> bool {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.unavailable(&self.fail_writes) {
            tracing::warn!(path = %path, "Store write failed (injected)");
            return false;
        }
        self.set(path, value.clone());
        true
    }

    async fn delete(&self, path: &str) -> bool {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        if self.unavailable(&self.fail_writes) {
            tracing::warn!(path = %path, "Store delete failed (injected)");
            return false;
        }
        self.remove(path);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_nested_write_and_parent_read() {
        let store = MemoryStore::new();
        assert!(store.write("/orders/1", &json!({"id": 1})).await);
        assert!(store.write("/orders/2", &json!({"id": 2})).await);

        let orders = store.read("/orders").await.unwrap();
        assert_eq!(orders.as_object().unwrap().len(), 2);
        assert_eq!(store.read("/orders/2/id").await, Some(json!(2)));
    }

    #[tokio::test]
    async fn test_delete_prunes_empty_parents() {
        let store = MemoryStore::new();
        store.set("/online_users/alice/last_seen", json!(10));
        assert!(store.delete("/online_users/alice").await);
        assert_eq!(store.read("/online_users").await, None);
        assert_eq!(store.get("/"), None);
    }

    #[tokio::test]
    async fn test_write_into_scalar_replaces_it() {
        let store = MemoryStore::new();
        store.set("/a", json!(5));
        store.set("/a/b", json!(true));
        assert_eq!(store.get("/a"), Some(json!({"b": true})));
    }

    #[tokio::test]
    async fn test_injected_read_failures_are_consumed() {
        let store = MemoryStore::new();
        store.set("/menu", json!({"1": {"name": "Soup", "price": 10}}));
        store.fail_next_reads(1);

        assert_eq!(store.read("/menu").await, None);
        assert!(store.read("/menu").await.is_some());
        assert_eq!(store.read_count(), 2);
    }

    #[tokio::test]
    async fn test_offline_fails_everything() {
        let store = MemoryStore::new();
        store.set_offline(true);
        assert!(!store.write("/x", &json!(1)).await);
        assert!(!store.delete("/x").await);
        assert_eq!(store.read("/x").await, None);

        store.set_offline(false);
        assert!(store.write("/x", &json!(1)).await);
        assert_eq!(store.get("/x"), Some(json!(1)));
    }

    #[tokio::test]
    async fn test_typed_reads_discard_undecodable_values() {
        let store = MemoryStore::new();
        store.set("/seen/alice", json!([3, 5]));
        store.set("/seen/bob", json!("yesterday"));

        let alice: Option<Vec<i64>> = crate::read_json(&store, "/seen/alice").await;
        assert_eq!(alice, Some(vec![3, 5]));
        assert_eq!(crate::read_json::<Vec<i64>>(&store, "/seen/bob").await, None);
        assert_eq!(crate::read_json::<Vec<i64>>(&store, "/seen/carol").await, None);
    }
}
