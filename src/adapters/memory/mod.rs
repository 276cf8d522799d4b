//! In-memory adapter. Implements RecordStore for offline runs and tests.

pub mod store;

pub use store::InMemoryRecordStore;
