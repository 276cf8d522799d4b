//! cineweb: cinema catalog and box office over a JSON record store, with Hexagonal Architecture.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod shared;
pub mod usecases;
