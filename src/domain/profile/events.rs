//! Domain events for the consolidated profile

use serde::{Deserialize, Serialize};

use super::{ConflictFlag, ProfileVersion};
use crate::domain::assessment::RespondentType;
use crate::domain::foundation::{AssessmentId, ChildName, ProfileId, Timestamp};

/// Domain events emitted by profile consolidation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProfileEvent {
    /// First assessment for a child created a new profile
    ProfileCreated {
        profile_id: ProfileId,
        child_name: ChildName,
        assessment_id: AssessmentId,
        created_at: Timestamp,
    },

    /// An assessment was merged into an existing profile
    ProfileConsolidated {
        profile_id: ProfileId,
        assessment_id: AssessmentId,
        respondent_type: RespondentType,
        version: ProfileVersion,
        total_assessments: u32,
        confidence_percentage: f64,
        completeness_percentage: f64,
        updated_at: Timestamp,
    },

    /// Consolidation surfaced medium or high cross-context conflicts
    ConflictsDetected {
        profile_id: ProfileId,
        conflicts: Vec<ConflictFlag>,
        detected_at: Timestamp,
    },
}

impl ProfileEvent {
    /// Dotted event type name used for routing.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::ProfileCreated { .. } => "profile.created",
            Self::ProfileConsolidated { .. } => "profile.consolidated",
            Self::ConflictsDetected { .. } => "profile.conflicts_detected",
        }
    }

    pub fn profile_id(&self) -> ProfileId {
        match self {
            Self::ProfileCreated { profile_id, .. }
            | Self::ProfileConsolidated { profile_id, .. }
            | Self::ConflictsDetected { profile_id, .. } => *profile_id,
        }
    }
}
