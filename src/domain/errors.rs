//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these.

use crate::domain::entities::{EntityId, EntityKind};
use std::fmt;
use thiserror::Error;

/// Record store failure: transport error or any non-success response.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("record store unreachable: {0}")]
    Transport(String),

    #[error("record store returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode {kind} record: {reason}")]
    Decode { kind: EntityKind, reason: String },

    #[error("could not encode {kind} record: {reason}")]
    Encode { kind: EntityKind, reason: String },
}

/// A stored identifier that no longer resolves.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{missing_kind} {missing_id} referenced by {referrer_kind} {referrer_id} was not found")]
pub struct ReferenceError {
    pub missing_kind: EntityKind,
    pub missing_id: EntityId,
    pub referrer_kind: EntityKind,
    pub referrer_id: EntityId,
}

/// One failed field rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Ordered field -> message map. At most one entry per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    entries: Vec<FieldError>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `message` for `field` unless that field already failed.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        if self.get(field).is_none() {
            self.entries.push(FieldError {
                field,
                message: message.into(),
            });
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|e| e.field)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.entries.iter()
    }

    /// `Ok(value)` when nothing failed.
    pub fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .entries
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for FieldErrors {}

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation failed: {0}")]
    Validation(#[from] FieldErrors),

    #[error("Dangling reference: {0}")]
    Reference(#[from] ReferenceError),

    #[error("Record store error: {0}")]
    Store(#[from] StoreError),

    #[error("Export failed: {0}")]
    Export(String),

    #[error("UI error: {0}")]
    Ui(String),
}
