//! HTTP adapter. Implements RecordStore against a JSON REST store.

pub mod json_store;

pub use json_store::HttpRecordStore;
