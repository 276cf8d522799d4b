//! In-process record store. Implements RecordStore without network I/O.
//!
//! Used for offline runs (`CINEWEB_STORE_BACKEND=memory`) and as the test
//! double for use cases. Assigns sequential string ids like json-server.

use crate::domain::{EntityId, EntityKind, StoreError};
use crate::ports::RecordStore;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::RwLock;
use tracing::info;

/// In-memory record store.
pub struct InMemoryRecordStore {
    collections: RwLock<HashMap<EntityKind, Vec<Value>>>,
    next_id: AtomicU64,
    offline: AtomicBool,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            offline: AtomicBool::new(false),
        }
    }

    /// Inserts records verbatim (they must already carry an `id`). Later
    /// creates are numbered past the highest numeric id seen.
    pub async fn seed(&self, kind: EntityKind, records: Vec<Value>) {
        if let Some(max) = records
            .iter()
            .filter_map(|r| record_id(r)?.parse::<u64>().ok())
            .max()
        {
            self.next_id.fetch_max(max.saturating_add(1), Ordering::SeqCst);
        }
        self.collections
            .write()
            .await
            .entry(kind)
            .or_default()
            .extend(records);
    }

    /// While offline every call fails with `StoreError::Transport`.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of stored records of `kind`.
    pub async fn count(&self, kind: EntityKind) -> usize {
        self.collections
            .read()
            .await
            .get(&kind)
            .map(Vec::len)
            .unwrap_or(0)
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Transport("record store offline".to_string()));
        }
        Ok(())
    }
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

fn record_id(record: &Value) -> Option<String> {
    match record.get("id")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[async_trait::async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn list(&self, kind: EntityKind) -> Result<Vec<Value>, StoreError> {
        self.check_online()?;
        let collections = self.collections.read().await;
        Ok(collections.get(&kind).cloned().unwrap_or_default())
    }

    async fn create(&self, kind: EntityKind, record: Value) -> Result<Value, StoreError> {
        self.check_online()?;
        let Value::Object(mut fields) = record else {
            return Err(StoreError::Status {
                status: 400,
                body: format!("{} record must be a JSON object", kind),
            });
        };
        let id = self.next_id.fetch_add(1, Ordering::SeqCst).to_string();
        fields.insert("id".to_string(), Value::String(id.clone()));
        let stored = Value::Object(fields);

        self.collections
            .write()
            .await
            .entry(kind)
            .or_default()
            .push(stored.clone());
        info!(kind = %kind, id = %id, "[MEMORY] record created");
        Ok(stored)
    }

    async fn delete(&self, kind: EntityKind, id: &EntityId) -> Result<(), StoreError> {
        self.check_online()?;
        let mut collections = self.collections.write().await;
        let records = collections.entry(kind).or_default();
        let before = records.len();
        records.retain(|r| record_id(r).as_deref() != Some(id.as_str()));
        if records.len() == before {
            return Err(StoreError::Status {
                status: 404,
                body: format!("{} {} not found", kind, id),
            });
        }
        info!(kind = %kind, id = %id, "[MEMORY] record deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_create_after_seed_does_not_reuse_ids() {
        let store = InMemoryRecordStore::new();
        store
            .seed(
                EntityKind::Movie,
                vec![json!({"id": "1"}), json!({"id": 5}), json!({"id": "m9"})],
            )
            .await;
        let created = store
            .create(EntityKind::Room, json!({"number": 1, "capacity": 10}))
            .await
            .unwrap();
        assert_eq!(created["id"], "6");
    }

    #[tokio::test]
    async fn test_create_assigns_ids_and_lists() {
        let store = InMemoryRecordStore::new();
        let a = store
            .create(EntityKind::Room, json!({"number": 1, "capacity": 10}))
            .await
            .unwrap();
        let b = store
            .create(EntityKind::Room, json!({"number": 2, "capacity": 20}))
            .await
            .unwrap();
        assert_ne!(a["id"], b["id"]);
        assert_eq!(store.list(EntityKind::Room).await.unwrap().len(), 2);
        assert!(store.list(EntityKind::Movie).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_matches_numeric_and_string_ids() {
        let store = InMemoryRecordStore::new();
        store
            .seed(
                EntityKind::Room,
                vec![json!({"id": 7, "number": 1, "capacity": 10})],
            )
            .await;
        store
            .delete(EntityKind::Room, &EntityId::new("7"))
            .await
            .unwrap();
        assert_eq!(store.count(EntityKind::Room).await, 0);

        let err = store
            .delete(EntityKind::Room, &EntityId::new("7"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_offline_fails_every_call() {
        let store = InMemoryRecordStore::new();
        store.set_offline(true);
        assert!(matches!(
            store.list(EntityKind::Movie).await,
            Err(StoreError::Transport(_))
        ));
        assert!(store.create(EntityKind::Movie, json!({})).await.is_err());
        store.set_offline(false);
        assert!(store.list(EntityKind::Movie).await.is_ok());
    }
}
