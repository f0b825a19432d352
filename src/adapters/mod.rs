//! Adapters - Implementations of port interfaces.
//!
//! - `profile` - ProfileStore backends (memory, filesystem, PostgreSQL)
//! - `events` - EventPublisher backends

pub mod events;
pub mod profile;

pub use events::{InMemoryEventBus, TracingEventPublisher};
pub use profile::{FsProfileStore, InMemoryProfileStore, PgProfileStore, StorageError};
