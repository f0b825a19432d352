//! ProfileStore adapters.
//!
//! - `InMemoryProfileStore` - process-local store for tests and demos
//! - `FsProfileStore` - JSON files with checksum envelope
//! - `PgProfileStore` - PostgreSQL with JSONB documents

mod filesystem;
mod in_memory;
mod postgres;

pub use filesystem::{FsProfileStore, StorageError};
pub use in_memory::InMemoryProfileStore;
pub use postgres::PgProfileStore;
