//! Event publisher that writes profile events to the tracing log.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::profile::ProfileEvent;
use crate::ports::EventPublisher;

/// Publishes events as structured `info` log lines.
///
/// Used by the binary when no message transport is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventPublisher;

impl TracingEventPublisher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EventPublisher for TracingEventPublisher {
    async fn publish(&self, event: ProfileEvent) -> Result<(), DomainError> {
        let payload = serde_json::to_string(&event).unwrap_or_default();
        tracing::info!(
            event_type = event.event_type(),
            profile_id = %event.profile_id(),
            payload = %payload,
            "Profile event"
        );
        Ok(())
    }
}
