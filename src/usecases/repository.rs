//! Typed access to the raw record store.
//!
//! Decodes store JSON into domain entities and encodes validated records.

use crate::domain::{Entity, EntityId, EntityKind, StoreError};
use crate::ports::RecordStore;
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

/// Entity repository client: list / create / delete per entity type.
#[derive(Clone)]
pub struct EntityRepository {
    store: Arc<dyn RecordStore>,
}

impl EntityRepository {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Every stored record of `E`. One undecodable record fails the list.
    pub async fn list<E: Entity>(&self) -> Result<Vec<E>, StoreError> {
        let raw = self.store.list(E::KIND).await?;
        raw.into_iter()
            .map(|value| {
                serde_json::from_value::<E>(value).map_err(|e| {
                    warn!(kind = %E::KIND, error = %e, "undecodable record");
                    StoreError::Decode {
                        kind: E::KIND,
                        reason: e.to_string(),
                    }
                })
            })
            .collect()
    }

    /// Stores `record` and returns the entity with its assigned id.
    pub async fn create<E: Entity>(&self, record: &impl Serialize) -> Result<E, StoreError> {
        let body = serde_json::to_value(record).map_err(|e| StoreError::Encode {
            kind: E::KIND,
            reason: e.to_string(),
        })?;
        let stored = self.store.create(E::KIND, body).await?;
        serde_json::from_value(stored).map_err(|e| StoreError::Decode {
            kind: E::KIND,
            reason: e.to_string(),
        })
    }

    pub async fn delete(&self, kind: EntityKind, id: &EntityId) -> Result<(), StoreError> {
        self.store.delete(kind, id).await
    }
}
