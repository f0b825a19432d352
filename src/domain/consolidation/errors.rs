//! Consolidation failures.

use thiserror::Error;

use crate::domain::assessment::SkillName;
use crate::domain::foundation::{AssessmentId, DomainError, ErrorCode, ProfileId};
use crate::domain::profile::ProfileVersion;

/// Why an assessment could not be consolidated. Nothing is applied when
/// any of these is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConsolidationError {
    #[error("Assessment {assessment_id} has no skill scores")]
    EmptyAssessment { assessment_id: AssessmentId },

    #[error("Score {score} for {} is outside 0..={max}", .skill.as_ref().map(SkillName::as_str).unwrap_or("skill"))]
    OutOfRangeScore {
        skill: Option<SkillName>,
        score: f64,
        max: f64,
    },

    #[error("Answer completeness {0} is outside 0..=1")]
    InvalidAnswerCompleteness(f64),

    #[error("Profile {profile_id} is at version {actual}, assessment expected {expected}")]
    StaleProfileVersion {
        profile_id: ProfileId,
        expected: ProfileVersion,
        actual: ProfileVersion,
    },

    #[error("Assessment targets profile {expected} but profile {actual} was supplied")]
    ProfileMismatch {
        expected: ProfileId,
        actual: ProfileId,
    },
}

impl ConsolidationError {
    /// Attach the skill an out-of-range score belongs to.
    pub fn for_skill(self, skill: &SkillName) -> Self {
        match self {
            Self::OutOfRangeScore { score, max, .. } => Self::OutOfRangeScore {
                skill: Some(skill.clone()),
                score,
                max,
            },
            other => other,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::EmptyAssessment { .. } => ErrorCode::EmptyAssessment,
            Self::OutOfRangeScore { .. } => ErrorCode::OutOfRange,
            Self::InvalidAnswerCompleteness(_) => ErrorCode::ValidationFailed,
            Self::StaleProfileVersion { .. } => ErrorCode::StaleProfileVersion,
            Self::ProfileMismatch { .. } => ErrorCode::ProfileMismatch,
        }
    }
}

impl From<ConsolidationError> for DomainError {
    fn from(err: ConsolidationError) -> Self {
        let code = err.code();
        let domain = DomainError::new(code, err.to_string());
        match err {
            ConsolidationError::OutOfRangeScore { skill: Some(skill), .. } => {
                domain.with_detail("skill", skill.as_str())
            }
            ConsolidationError::StaleProfileVersion { actual, .. } => {
                domain.with_detail("current_version", actual.to_string())
            }
            _ => domain,
        }
    }
}
