//! Assessment input value.

use serde::{Deserialize, Serialize};

use super::{AgeGroup, QuizType, RespondentType, ScoringVersion, SkillScores};
use crate::domain::foundation::{AssessmentId, ChildName, ProfileId, Timestamp};
use crate::domain::profile::ProfileVersion;

fn default_answer_completeness() -> f64 {
    1.0
}

/// One submitted learning assessment, already scored per skill.
///
/// Immutable once submitted; the consolidator only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    #[serde(default)]
    pub id: AssessmentId,
    pub child_name: ChildName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_group: Option<AgeGroup>,
    pub quiz_type: QuizType,
    pub respondent_type: RespondentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub respondent_name: Option<String>,
    #[serde(default)]
    pub submitted_at: Timestamp,
    pub scoring_version: ScoringVersion,
    pub skill_scores: SkillScores,
    /// Fraction of expected questions answered, in `[0, 1]`.
    #[serde(default = "default_answer_completeness")]
    pub completeness_of_answers: f64,
    /// Profile this assessment should merge into, when the caller knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub existing_profile_id: Option<ProfileId>,
    /// Profile version the submitter last observed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_version: Option<ProfileVersion>,
}

impl Assessment {
    /// Creates a fully-answered assessment submitted now.
    pub fn new(
        child_name: ChildName,
        quiz_type: QuizType,
        respondent_type: RespondentType,
        scoring_version: ScoringVersion,
        skill_scores: SkillScores,
    ) -> Self {
        Self {
            id: AssessmentId::new(),
            child_name,
            age_group: None,
            quiz_type,
            respondent_type,
            respondent_name: None,
            submitted_at: Timestamp::now(),
            scoring_version,
            skill_scores,
            completeness_of_answers: 1.0,
            existing_profile_id: None,
            expected_version: None,
        }
    }

    pub fn with_age_group(mut self, age_group: AgeGroup) -> Self {
        self.age_group = Some(age_group);
        self
    }

    pub fn with_respondent_name(mut self, name: impl Into<String>) -> Self {
        self.respondent_name = Some(name.into());
        self
    }

    pub fn with_submitted_at(mut self, submitted_at: Timestamp) -> Self {
        self.submitted_at = submitted_at;
        self
    }

    pub fn with_answer_completeness(mut self, completeness: f64) -> Self {
        self.completeness_of_answers = completeness;
        self
    }

    /// Targets an existing profile at the version the submitter saw.
    pub fn for_profile(mut self, profile_id: ProfileId, expected_version: ProfileVersion) -> Self {
        self.existing_profile_id = Some(profile_id);
        self.expected_version = Some(expected_version);
        self
    }

    /// Copy of this assessment expecting `version` instead, used when a
    /// caller reloads after a concurrent write and resubmits.
    pub fn rebased_on(&self, version: ProfileVersion) -> Self {
        let mut rebased = self.clone();
        rebased.expected_version = Some(version);
        rebased
    }

    /// Whether some expected questions were left unanswered.
    pub fn has_partial_answers(&self) -> bool {
        self.completeness_of_answers < 1.0
    }
}
