//! ConsolidateAssessmentHandler - Command handler that folds one assessment
//! into its child's learning profile and persists the result.

use std::sync::Arc;

use crate::domain::assessment::Assessment;
use crate::domain::consolidation::ProfileConsolidator;
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::profile::{ConsolidatedProfile, ProfileEvent};
use crate::ports::{EventPublisher, ProfileStore};

/// Default number of reload-and-retry rounds after a concurrent write.
pub const DEFAULT_MAX_SAVE_RETRIES: u32 = 3;

/// Command to consolidate a submitted assessment.
#[derive(Debug, Clone)]
pub struct ConsolidateAssessmentCommand {
    pub assessment: Assessment,
}

/// Result of a successful consolidation.
#[derive(Debug, Clone)]
pub struct ConsolidateAssessmentResult {
    pub profile: ConsolidatedProfile,
    pub events: Vec<ProfileEvent>,
    pub created: bool,
    /// Number of load-consolidate-save rounds it took (1 without contention).
    pub attempts: u32,
}

/// Handler for consolidating assessments.
///
/// The target profile is the assessment's `existing_profile_id` when set,
/// otherwise the oldest profile for the same child, otherwise a new one.
/// Saves use the store's optimistic version check; on
/// `StaleProfileVersion` the handler reloads, rebases the assessment on the
/// fresh version and tries again, at most `max_save_retries` times.
pub struct ConsolidateAssessmentHandler {
    store: Arc<dyn ProfileStore>,
    event_publisher: Arc<dyn EventPublisher>,
    consolidator: ProfileConsolidator,
    max_save_retries: u32,
}

impl ConsolidateAssessmentHandler {
    pub fn new(
        store: Arc<dyn ProfileStore>,
        event_publisher: Arc<dyn EventPublisher>,
        consolidator: ProfileConsolidator,
    ) -> Self {
        Self {
            store,
            event_publisher,
            consolidator,
            max_save_retries: DEFAULT_MAX_SAVE_RETRIES,
        }
    }

    pub fn with_max_save_retries(mut self, max_save_retries: u32) -> Self {
        self.max_save_retries = max_save_retries;
        self
    }

    pub async fn handle(
        &self,
        cmd: ConsolidateAssessmentCommand,
    ) -> Result<ConsolidateAssessmentResult, DomainError> {
        let mut assessment = cmd.assessment;
        let mut attempts = 0;

        loop {
            attempts += 1;
            let retries_left = attempts <= self.max_save_retries;

            // 1. Resolve target profile
            let existing = self.resolve_target(&assessment).await?;
            if attempts > 1 {
                if let Some(profile) = &existing {
                    assessment = assessment.rebased_on(profile.version());
                }
            }

            // 2. Consolidate (pure)
            let outcome = match self.consolidator.consolidate(existing.as_ref(), &assessment) {
                Ok(outcome) => outcome,
                Err(err) => {
                    let err = DomainError::from(err);
                    if err.code == ErrorCode::StaleProfileVersion && retries_left {
                        tracing::warn!(
                            assessment_id = %assessment.id,
                            attempt = attempts,
                            "Assessment expected an older profile version, rebasing"
                        );
                        continue;
                    }
                    return Err(err);
                }
            };

            // 3. Persist with version check
            match self.store.save(&outcome.profile).await {
                Ok(()) => {}
                Err(err) if err.code == ErrorCode::StaleProfileVersion && retries_left => {
                    tracing::warn!(
                        profile_id = %outcome.profile.id(),
                        assessment_id = %assessment.id,
                        attempt = attempts,
                        "Profile changed during consolidation, retrying"
                    );
                    continue;
                }
                Err(err) => return Err(err),
            }

            // 4. Publish events
            self.event_publisher
                .publish_all(outcome.events.clone())
                .await?;

            return Ok(ConsolidateAssessmentResult {
                profile: outcome.profile,
                events: outcome.events,
                created: outcome.created,
                attempts,
            });
        }
    }

    async fn resolve_target(
        &self,
        assessment: &Assessment,
    ) -> Result<Option<ConsolidatedProfile>, DomainError> {
        match assessment.existing_profile_id {
            Some(id) => {
                let profile = self.store.load(id).await?.ok_or_else(|| {
                    DomainError::new(ErrorCode::ProfileNotFound, format!("Profile not found: {}", id))
                        .with_detail("profile_id", id.to_string())
                })?;
                Ok(Some(profile))
            }
            None => self.store.find_by_child_name(&assessment.child_name).await,
        }
    }
}
