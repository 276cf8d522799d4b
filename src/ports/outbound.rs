//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{EntityId, EntityKind, StoreError};
use serde_json::Value;

/// Record store exposing one JSON collection per entity kind.
///
/// Deals in raw records; typing happens in `usecases::EntityRepository`.
/// Any transport failure or non-success response is a `StoreError`.
#[async_trait::async_trait]
pub trait RecordStore: Send + Sync {
    /// `GET /<collection>`: every record of `kind`.
    async fn list(&self, kind: EntityKind) -> Result<Vec<Value>, StoreError>;

    /// `POST /<collection>`: stores `record` (no id) and returns it with the
    /// id the store assigned.
    async fn create(&self, kind: EntityKind, record: Value) -> Result<Value, StoreError>;

    /// `DELETE /<collection>/<id>`.
    async fn delete(&self, kind: EntityKind, id: &EntityId) -> Result<(), StoreError>;
}

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Failure,
}

/// Discrete message for the presentation layer (toast).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Failure,
            message: message.into(),
        }
    }
}

/// Presentation sink for success / failure notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Asks the user to confirm a destructive action.
#[async_trait::async_trait]
pub trait Confirmer: Send + Sync {
    /// `true` only on explicit acceptance.
    async fn confirm(&self, question: &str) -> bool;
}
