//! In-memory [`RemoteStore`] used by the integration tests in place of a
//! live HTTP endpoint. Semantics mirror the remote store: items are kept
//! in insertion order, PATCH merges top-level fields, last write wins.

use crate::store::{RemoteStore, StoreError};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::Mutex;

#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, Vec<Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn item_id(item: &Value) -> Option<&str> {
    item.get("id").and_then(Value::as_str)
}

fn not_found(collection: &str, id: &str) -> StoreError {
    StoreError::NotFound {
        collection: collection.to_string(),
        id: id.to_string(),
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn list(&self, collection: &str) -> Result<Vec<Value>, StoreError> {
        let collections = self.collections.lock().await;
        Ok(collections.get(collection).cloned().unwrap_or_default())
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Value, StoreError> {
        let collections = self.collections.lock().await;
        collections
            .get(collection)
            .and_then(|items| items.iter().find(|item| item_id(item) == Some(id)))
            .cloned()
            .ok_or_else(|| not_found(collection, id))
    }

    async fn create(&self, collection: &str, item: &Value) -> Result<Value, StoreError> {
        let mut collections = self.collections.lock().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .push(item.clone());
        Ok(item.clone())
    }

    async fn patch(&self, collection: &str, id: &str, changes: &Value) -> Result<Value, StoreError> {
        let mut collections = self.collections.lock().await;
        let items = collections
            .get_mut(collection)
            .ok_or_else(|| not_found(collection, id))?;
        let item = items
            .iter_mut()
            .find(|item| item_id(item) == Some(id))
            .ok_or_else(|| not_found(collection, id))?;

        if let (Some(target), Some(changes)) = (item.as_object_mut(), changes.as_object()) {
            for (key, value) in changes {
                target.insert(key.clone(), value.clone());
            }
        }
        Ok(item.clone())
    }

    async fn put(&self, collection: &str, id: &str, replacement: &Value) -> Result<Value, StoreError> {
        let mut collections = self.collections.lock().await;
        let items = collections
            .get_mut(collection)
            .ok_or_else(|| not_found(collection, id))?;
        let item = items
            .iter_mut()
            .find(|item| item_id(item) == Some(id))
            .ok_or_else(|| not_found(collection, id))?;
        *item = replacement.clone();
        Ok(item.clone())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let mut collections = self.collections.lock().await;
        let items = collections
            .get_mut(collection)
            .ok_or_else(|| not_found(collection, id))?;
        let before = items.len();
        items.retain(|item| item_id(item) != Some(id));
        if items.len() == before {
            return Err(not_found(collection, id));
        }
        Ok(())
    }
}
