//! Infrastructure adapters. Implement outbound ports.
//!
//! HTTP record store, in-memory store, CSV export, terminal UI.
//! Map errors to StoreError / DomainError.

pub mod export;
pub mod http;
pub mod memory;
pub mod ui;
