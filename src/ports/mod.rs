//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `ProfileStore` - Consolidated profile persistence with optimistic concurrency
//! - `EventPublisher` - Port for publishing profile events

mod event_publisher;
mod profile_store;

pub use event_publisher::EventPublisher;
pub use profile_store::{check_child_unclaimed, check_save_version, ProfileStore};
