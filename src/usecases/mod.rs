//! Application use cases. Orchestrate domain logic via ports.

pub mod catalog;
pub mod orchestrator;
pub mod repository;

pub use catalog::{Catalog, HomeView};
pub use orchestrator::{Clock, MutationOrchestrator, MutationOutcome, MutationPhase, SystemClock};
pub use repository::EntityRepository;
