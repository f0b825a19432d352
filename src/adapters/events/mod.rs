//! Event publisher adapters.
//!
//! - `InMemoryEventBus` - Captures events in process for testing
//! - `TracingEventPublisher` - Writes events to the structured log

mod in_memory;
mod logging;

pub use in_memory::InMemoryEventBus;
pub use logging::TracingEventPublisher;
