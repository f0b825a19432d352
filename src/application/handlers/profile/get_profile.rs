//! GetProfileHandler - Query handler returning the presentation view of a
//! consolidated profile.

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::assessment::ScoringVersion;
use crate::domain::foundation::{ChildName, DomainError, ErrorCode, ProfileId, Timestamp};
use crate::domain::profile::{AssessmentCounts, ConflictFlag, ConsolidatedProfile, DataSource};
use crate::ports::ProfileStore;

/// How to find the profile.
#[derive(Debug, Clone)]
pub enum GetProfileQuery {
    ById(ProfileId),
    ByChildName(ChildName),
}

/// Read model for dashboards. Every derived figure comes from the profile;
/// consumers never recompute confidence, completeness or rankings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileView {
    pub profile_id: ProfileId,
    pub child_name: String,
    pub age_group: Option<String>,
    pub scoring_version: ScoringVersion,
    pub consolidated_scores: BTreeMap<String, f64>,
    pub confidence_percentage: u8,
    pub completeness_percentage: u8,
    #[serde(flatten)]
    pub counts: AssessmentCounts,
    pub strengths: Vec<String>,
    pub growth_areas: Vec<String>,
    pub conflicts: Vec<ConflictFlag>,
    pub data_sources: Vec<DataSource>,
    pub personality_label: Option<String>,
    pub version: u32,
    pub updated_at: Timestamp,
}

impl From<&ConsolidatedProfile> for ProfileView {
    fn from(profile: &ConsolidatedProfile) -> Self {
        Self {
            profile_id: profile.id(),
            child_name: profile.child_name().to_string(),
            age_group: profile.age_group().map(|a| a.to_string()),
            scoring_version: profile.scoring_version(),
            consolidated_scores: profile
                .consolidated_scores()
                .iter()
                .map(|(skill, score)| (skill.to_string(), (score * 100.0).round() / 100.0))
                .collect(),
            confidence_percentage: profile.confidence_percentage().rounded(),
            completeness_percentage: profile.completeness_percentage().rounded(),
            counts: profile.counts(),
            strengths: profile.strengths().iter().map(|s| s.to_string()).collect(),
            growth_areas: profile.growth_areas().iter().map(|s| s.to_string()).collect(),
            conflicts: profile.conflicts().to_vec(),
            data_sources: profile.data_sources().to_vec(),
            personality_label: profile.personality_label().map(str::to_string),
            version: profile.version().as_u32(),
            updated_at: profile.updated_at(),
        }
    }
}

/// Handler for retrieving profile views.
pub struct GetProfileHandler {
    store: Arc<dyn ProfileStore>,
}

impl GetProfileHandler {
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, query: GetProfileQuery) -> Result<ProfileView, DomainError> {
        let (profile, key) = match &query {
            GetProfileQuery::ById(id) => (self.store.load(*id).await?, id.to_string()),
            GetProfileQuery::ByChildName(name) => {
                (self.store.find_by_child_name(name).await?, name.to_string())
            }
        };

        profile
            .as_ref()
            .map(ProfileView::from)
            .ok_or_else(|| {
                DomainError::new(ErrorCode::ProfileNotFound, format!("Profile not found: {}", key))
            })
    }
}
