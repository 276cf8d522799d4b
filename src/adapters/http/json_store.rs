//! JSON-over-HTTP record store (json-server style). Implements RecordStore.
//!
//! One collection per entity kind under `base_url`: `GET /movies`,
//! `POST /movies`, `DELETE /movies/<id>`. No auth header, no retries.

use crate::domain::{EntityId, EntityKind, StoreError};
use crate::ports::RecordStore;
use reqwest::{Client, Response, Url};
use serde_json::Value;
use tracing::{debug, info, warn};

/// HTTP record store adapter.
pub struct HttpRecordStore {
    client: Client,
    base_url: String,
}

impl HttpRecordStore {
    /// # Arguments
    /// * `base_url` - Store root, e.g. "http://localhost:3000" (trailing slash optional)
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn collection_url(&self, kind: EntityKind) -> String {
        format!("{}/{}", self.base_url, kind.collection())
    }

    /// `<collection>/<id>` with `id` percent-encoded as a single path segment.
    fn record_url(&self, kind: EntityKind, id: &EntityId) -> Result<Url, StoreError> {
        let mut url = Url::parse(&self.collection_url(kind))
            .map_err(|e| StoreError::Transport(format!("invalid store URL {}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| StoreError::Transport(format!("store URL {} cannot hold a path", self.base_url)))?
            .push(id.as_str());
        Ok(url)
    }

    /// Maps any non-2xx response to `StoreError::Status`.
    async fn ensure_success(response: Response) -> Result<Response, StoreError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        warn!(status = %status, body = %text, "record store returned error");
        Err(StoreError::Status {
            status: status.as_u16(),
            body: text.chars().take(200).collect(),
        })
    }
}

#[async_trait::async_trait]
impl RecordStore for HttpRecordStore {
    async fn list(&self, kind: EntityKind) -> Result<Vec<Value>, StoreError> {
        let url = self.collection_url(kind);
        debug!(%url, "listing records");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| StoreError::Transport(format!("GET {} failed: {}", url, e)))?;
        let response = Self::ensure_success(response).await?;

        let records: Vec<Value> = response.json().await.map_err(|e| StoreError::Decode {
            kind,
            reason: e.to_string(),
        })?;

        info!(kind = %kind, count = records.len(), "records listed");
        Ok(records)
    }

    async fn create(&self, kind: EntityKind, record: Value) -> Result<Value, StoreError> {
        let url = self.collection_url(kind);

        let response = self
            .client
            .post(&url)
            .json(&record)
            .send()
            .await
            .map_err(|e| StoreError::Transport(format!("POST {} failed: {}", url, e)))?;
        let response = Self::ensure_success(response).await?;

        let stored: Value = response.json().await.map_err(|e| StoreError::Decode {
            kind,
            reason: e.to_string(),
        })?;

        let id = stored.get("id").cloned().unwrap_or(Value::Null);
        info!(kind = %kind, id = %id, "record created");
        Ok(stored)
    }

    async fn delete(&self, kind: EntityKind, id: &EntityId) -> Result<(), StoreError> {
        let url = self.record_url(kind, id)?;

        let response = self
            .client
            .delete(url.clone())
            .send()
            .await
            .map_err(|e| StoreError::Transport(format!("DELETE {} failed: {}", url, e)))?;
        Self::ensure_success(response).await?;

        info!(kind = %kind, id = %id, "record deleted");
        Ok(())
    }
}
