//! EventPublisher port - Interface for publishing profile events.
//!
//! This port defines how consolidation outcomes are announced without
//! knowing about the underlying transport mechanism.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::profile::ProfileEvent;

/// Port for publishing domain events.
///
/// Implementations must ensure:
/// - Events are delivered at-least-once (handlers may receive duplicates)
/// - Errors are propagated to the caller
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish a single event.
    async fn publish(&self, event: ProfileEvent) -> Result<(), DomainError>;

    /// Publish multiple events in order.
    ///
    /// Stops at the first failure; earlier events stay published.
    async fn publish_all(&self, events: Vec<ProfileEvent>) -> Result<(), DomainError> {
        for event in events {
            self.publish(event).await?;
        }
        Ok(())
    }
}
