//! ConsolidatedProfile aggregate root and core value objects

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::ConflictFlag;
use crate::domain::assessment::{AgeGroup, QuizType, RespondentType, ScoringVersion, SkillName};
use crate::domain::consolidation::MergedScores;
use crate::domain::foundation::{AssessmentId, ChildName, Percentage, ProfileId, Timestamp};

/// Profile version for optimistic concurrency
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct ProfileVersion(u32);

impl ProfileVersion {
    /// Create initial version (1)
    pub fn initial() -> Self {
        Self(1)
    }

    /// Create from value
    pub fn from_u32(value: u32) -> Result<Self, &'static str> {
        if value == 0 {
            Err("Profile version must be greater than 0")
        } else {
            Ok(Self(value))
        }
    }

    /// Increment version
    pub fn increment(&self) -> Self {
        Self(self.0 + 1)
    }

    /// Get inner value
    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl Default for ProfileVersion {
    fn default() -> Self {
        Self::initial()
    }
}

impl TryFrom<u32> for ProfileVersion {
    type Error = &'static str;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::from_u32(value)
    }
}

impl From<ProfileVersion> for u32 {
    fn from(version: ProfileVersion) -> Self {
        version.0
    }
}

impl std::fmt::Display for ProfileVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Assessment counters per respondent type.
///
/// `total_assessments` always equals the sum of the three typed counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentCounts {
    pub total_assessments: u32,
    pub parent_assessments: u32,
    pub teacher_assessments: u32,
    pub other_assessments: u32,
}

impl AssessmentCounts {
    /// Count one more assessment from `respondent`.
    pub fn record(&mut self, respondent: RespondentType) {
        match respondent {
            RespondentType::Parent => self.parent_assessments += 1,
            RespondentType::Teacher => self.teacher_assessments += 1,
            RespondentType::Other => self.other_assessments += 1,
        }
        self.total_assessments += 1;
    }

    /// Assessments seen so far from `respondent`.
    pub fn of(&self, respondent: RespondentType) -> u32 {
        match respondent {
            RespondentType::Parent => self.parent_assessments,
            RespondentType::Teacher => self.teacher_assessments,
            RespondentType::Other => self.other_assessments,
        }
    }

    /// Respondent types with at least one assessment.
    pub fn represented(&self) -> Vec<RespondentType> {
        RespondentType::ALL
            .into_iter()
            .filter(|rt| self.of(*rt) > 0)
            .collect()
    }
}

/// One contributing assessment, as recorded on the profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSource {
    pub assessment_id: AssessmentId,
    pub quiz_type: QuizType,
    pub respondent_type: RespondentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub respondent_name: Option<String>,
    pub contributed_at: Timestamp,
    /// Confidence points this assessment actually added.
    pub confidence_contribution: f64,
    pub answer_completeness: f64,
    pub partial_answers: bool,
    /// Newest entry for its respondent type.
    pub is_current: bool,
}

/// ConsolidatedProfile aggregate root
///
/// The single evolving record merging every assessment submitted for one
/// child. Only the consolidator produces new versions of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsolidatedProfile {
    // Identity
    pub(crate) id: ProfileId,
    pub(crate) child_name: ChildName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) age_group: Option<AgeGroup>,

    // Scores
    pub(crate) scoring_version: ScoringVersion,
    pub(crate) consolidated_scores: BTreeMap<SkillName, f64>,
    pub(crate) merged_scores: MergedScores,
    pub(crate) respondent_snapshots: BTreeMap<RespondentType, MergedScores>,

    // Evidence
    pub(crate) confidence_percentage: Percentage,
    pub(crate) completeness_percentage: Percentage,
    #[serde(flatten)]
    pub(crate) counts: AssessmentCounts,
    pub(crate) data_sources: Vec<DataSource>,

    // Derived annotations
    pub(crate) conflicts: Vec<ConflictFlag>,
    pub(crate) strengths: Vec<SkillName>,
    pub(crate) growth_areas: Vec<SkillName>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) personality_label: Option<String>,

    // Metadata
    pub(crate) created_at: Timestamp,
    pub(crate) updated_at: Timestamp,
    pub(crate) version: ProfileVersion,
}

impl ConsolidatedProfile {
    /// Empty profile shell; the consolidator fills it from the first assessment.
    pub(crate) fn empty(
        child_name: ChildName,
        scoring_version: ScoringVersion,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            id: ProfileId::new(),
            child_name,
            age_group: None,
            scoring_version,
            consolidated_scores: BTreeMap::new(),
            merged_scores: MergedScores::new(),
            respondent_snapshots: BTreeMap::new(),
            confidence_percentage: Percentage::ZERO,
            completeness_percentage: Percentage::ZERO,
            counts: AssessmentCounts::default(),
            data_sources: Vec::new(),
            conflicts: Vec::new(),
            strengths: Vec::new(),
            growth_areas: Vec::new(),
            personality_label: None,
            created_at: timestamp,
            updated_at: timestamp,
            version: ProfileVersion::initial(),
        }
    }

    // Getters
    pub fn id(&self) -> ProfileId {
        self.id
    }

    pub fn child_name(&self) -> &ChildName {
        &self.child_name
    }

    pub fn age_group(&self) -> Option<&AgeGroup> {
        self.age_group.as_ref()
    }

    pub fn scoring_version(&self) -> ScoringVersion {
        self.scoring_version
    }

    /// Scores on the native scale of [`Self::scoring_version`].
    pub fn consolidated_scores(&self) -> &BTreeMap<SkillName, f64> {
        &self.consolidated_scores
    }

    /// Normalized merge state, per skill.
    pub fn merged_scores(&self) -> &MergedScores {
        &self.merged_scores
    }

    /// Normalized merge state, per respondent type.
    pub fn respondent_snapshots(&self) -> &BTreeMap<RespondentType, MergedScores> {
        &self.respondent_snapshots
    }

    pub fn confidence_percentage(&self) -> Percentage {
        self.confidence_percentage
    }

    pub fn completeness_percentage(&self) -> Percentage {
        self.completeness_percentage
    }

    pub fn counts(&self) -> AssessmentCounts {
        self.counts
    }

    pub fn total_assessments(&self) -> u32 {
        self.counts.total_assessments
    }

    pub fn parent_assessments(&self) -> u32 {
        self.counts.parent_assessments
    }

    pub fn teacher_assessments(&self) -> u32 {
        self.counts.teacher_assessments
    }

    pub fn other_assessments(&self) -> u32 {
        self.counts.other_assessments
    }

    pub fn data_sources(&self) -> &[DataSource] {
        &self.data_sources
    }

    pub fn conflicts(&self) -> &[ConflictFlag] {
        &self.conflicts
    }

    pub fn has_high_conflicts(&self) -> bool {
        self.conflicts.iter().any(ConflictFlag::is_high)
    }

    pub fn strengths(&self) -> &[SkillName] {
        &self.strengths
    }

    pub fn growth_areas(&self) -> &[SkillName] {
        &self.growth_areas
    }

    pub fn personality_label(&self) -> Option<&str> {
        self.personality_label.as_deref()
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    pub fn version(&self) -> ProfileVersion {
        self.version
    }

    /// Consolidated score for one skill, on the profile's native scale.
    pub fn score_of(&self, skill: &SkillName) -> Option<f64> {
        self.consolidated_scores.get(skill).copied()
    }

    /// Record the label derived by the external personality classifier.
    ///
    /// Does not bump the version: the label is presentation metadata the
    /// store persists alongside whatever version it annotates.
    pub fn set_personality_label(&mut self, label: impl Into<String>) {
        self.personality_label = Some(label.into());
    }
}
