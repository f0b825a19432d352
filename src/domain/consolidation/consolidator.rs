//! Profile Consolidator - folds one assessment into a learning profile.
//!
//! Pure and synchronous: the input profile is never mutated, the result is
//! a fresh value the caller persists. Callers must serialize updates to the
//! same profile; a stale `expected_version` is rejected, not merged.

use std::collections::BTreeMap;

use super::{
    CompletenessEstimator, ConfidenceEstimator, ConfidenceSignals, ConflictDetector,
    ConsolidationError, ConsolidationPolicy, MergedScores, NormalizedScores, ScoreMerger,
    SkillRanking,
};
use crate::domain::assessment::{Assessment, RespondentType};
use crate::domain::foundation::Timestamp;
use crate::domain::profile::{ConflictFlag, ConsolidatedProfile, DataSource, ProfileEvent};

/// Result of a successful consolidation.
#[derive(Debug, Clone)]
pub struct ConsolidationOutcome {
    pub profile: ConsolidatedProfile,
    pub events: Vec<ProfileEvent>,
    /// The assessment created the profile rather than merging into one.
    pub created: bool,
}

/// Orchestrates merger, confidence, completeness, conflicts and ranking.
#[derive(Debug, Clone, Default)]
pub struct ProfileConsolidator {
    policy: ConsolidationPolicy,
}

impl ProfileConsolidator {
    pub fn new(policy: ConsolidationPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ConsolidationPolicy {
        &self.policy
    }

    /// Consolidate `incoming` into `existing` (or a new profile) now.
    pub fn consolidate(
        &self,
        existing: Option<&ConsolidatedProfile>,
        incoming: &Assessment,
    ) -> Result<ConsolidationOutcome, ConsolidationError> {
        self.consolidate_at(existing, incoming, Timestamp::now())
    }

    /// Consolidate with an explicit clock reading.
    ///
    /// # Errors
    ///
    /// - `EmptyAssessment` when no skill scores were supplied
    /// - `OutOfRangeScore` when any score is outside its version's scale
    /// - `InvalidAnswerCompleteness` when the answer fraction is outside [0, 1]
    /// - `ProfileMismatch` / `StaleProfileVersion` when the assessment targets
    ///   a different profile or an older version of this one
    pub fn consolidate_at(
        &self,
        existing: Option<&ConsolidatedProfile>,
        incoming: &Assessment,
        now: Timestamp,
    ) -> Result<ConsolidationOutcome, ConsolidationError> {
        let normalized = Self::validate(incoming)?;
        if let Some(profile) = existing {
            Self::check_target(profile, incoming)?;
        }

        let created = existing.is_none();
        let mut profile = match existing {
            Some(profile) => profile.clone(),
            None => ConsolidatedProfile::empty(
                incoming.child_name.clone(),
                incoming.scoring_version,
                now,
            ),
        };

        if !created && profile.child_name != incoming.child_name {
            tracing::warn!(
                profile_id = %profile.id,
                profile_child = %profile.child_name,
                assessment_child = %incoming.child_name,
                "Assessment child name differs from profile"
            );
        }

        let respondent = incoming.respondent_type;
        let weight = self
            .policy
            .weighting
            .weight_of(&incoming.quiz_type, respondent);
        let same_type_count = profile.counts.of(respondent);

        // Scores
        profile.merged_scores =
            ScoreMerger::merge(&profile.merged_scores, &normalized, weight.base_weight);
        let snapshot = profile
            .respondent_snapshots
            .get(&respondent)
            .cloned()
            .unwrap_or_default();
        profile.respondent_snapshots.insert(
            respondent,
            ScoreMerger::merge(&snapshot, &normalized, weight.base_weight),
        );

        let previous_version = profile.scoring_version;
        profile.scoring_version = previous_version.after_merging(incoming.scoring_version);
        if previous_version != incoming.scoring_version
            && profile.scoring_version == previous_version
        {
            tracing::debug!(
                profile_id = %profile.id,
                assessment_version = %incoming.scoring_version,
                "Older-scale assessment normalized into newer-scale profile"
            );
        }
        profile.consolidated_scores =
            ScoreMerger::denormalize(&profile.merged_scores, profile.scoring_version);

        // Conflicts
        let detector = ConflictDetector::new(
            self.policy.medium_conflict_threshold,
            self.policy.high_conflict_threshold,
        );
        profile.conflicts = detector.detect(&snapshot_values(&profile.respondent_snapshots));

        // Confidence
        let signals = ConfidenceSignals {
            corroborated: !created
                && same_type_count == 0
                && corroborates(&profile, respondent, &normalized),
            high_conflict: profile.has_high_conflicts(),
        };
        let estimator = ConfidenceEstimator::new(
            &self.policy.weighting,
            self.policy.corroboration_bonus,
            self.policy.conflict_confidence_ceiling,
        );
        let before = profile.confidence_percentage;
        profile.confidence_percentage = estimator.advance(
            before,
            respondent,
            &incoming.quiz_type,
            same_type_count,
            signals,
        );

        // Provenance
        profile.counts.record(respondent);
        for source in profile
            .data_sources
            .iter_mut()
            .filter(|s| s.respondent_type == respondent)
        {
            source.is_current = false;
        }
        profile.data_sources.push(DataSource {
            assessment_id: incoming.id,
            quiz_type: incoming.quiz_type.clone(),
            respondent_type: respondent,
            respondent_name: incoming.respondent_name.clone(),
            contributed_at: incoming.submitted_at,
            confidence_contribution: profile.confidence_percentage.value() - before.value(),
            answer_completeness: incoming.completeness_of_answers,
            partial_answers: incoming.has_partial_answers(),
            is_current: true,
        });

        // Completeness
        let best_answers: BTreeMap<RespondentType, f64> = profile
            .counts
            .represented()
            .into_iter()
            .map(|rt| {
                let best = profile
                    .data_sources
                    .iter()
                    .filter(|s| s.respondent_type == rt)
                    .map(|s| s.answer_completeness)
                    .fold(0.0, f64::max);
                (rt, best)
            })
            .collect();
        profile.completeness_percentage = CompletenessEstimator::new(
            &self.policy.context_points,
            self.policy.answer_quality_floor,
        )
        .completeness(&best_answers);

        // Ranking
        let (strengths, growth_areas) =
            SkillRanking::new(self.policy.ranking_size).rank(&profile.merged_scores);
        profile.strengths = strengths;
        profile.growth_areas = growth_areas;

        // Metadata
        if incoming.age_group.is_some() {
            profile.age_group = incoming.age_group.clone();
        }
        profile.updated_at = now;
        if !created {
            profile.version = profile.version.increment();
        }

        let events = build_events(&profile, incoming, created, existing.map(|p| p.conflicts()));

        if created {
            tracing::info!(
                profile_id = %profile.id,
                child = %profile.child_name,
                respondent_type = %respondent,
                confidence = profile.confidence_percentage.value(),
                "Created learning profile"
            );
        } else {
            tracing::info!(
                profile_id = %profile.id,
                version = %profile.version,
                respondent_type = %respondent,
                total_assessments = profile.counts.total_assessments,
                confidence = profile.confidence_percentage.value(),
                completeness = profile.completeness_percentage.value(),
                conflicts = profile.conflicts.len(),
                "Consolidated assessment into learning profile"
            );
        }

        Ok(ConsolidationOutcome {
            profile,
            events,
            created,
        })
    }

    /// Reject unusable input before anything is applied.
    fn validate(incoming: &Assessment) -> Result<NormalizedScores, ConsolidationError> {
        if incoming.skill_scores.is_empty() {
            return Err(ConsolidationError::EmptyAssessment {
                assessment_id: incoming.id,
            });
        }
        let completeness = incoming.completeness_of_answers;
        if !(0.0..=1.0).contains(&completeness) {
            return Err(ConsolidationError::InvalidAnswerCompleteness(completeness));
        }
        ScoreMerger::normalize_scores(&incoming.skill_scores, incoming.scoring_version)
    }

    fn check_target(
        profile: &ConsolidatedProfile,
        incoming: &Assessment,
    ) -> Result<(), ConsolidationError> {
        if let Some(target) = incoming.existing_profile_id {
            if target != profile.id {
                return Err(ConsolidationError::ProfileMismatch {
                    expected: target,
                    actual: profile.id,
                });
            }
        }
        if let Some(expected) = incoming.expected_version {
            if expected != profile.version {
                return Err(ConsolidationError::StaleProfileVersion {
                    profile_id: profile.id,
                    expected,
                    actual: profile.version,
                });
            }
        }
        Ok(())
    }
}

fn snapshot_values(
    snapshots: &BTreeMap<RespondentType, MergedScores>,
) -> BTreeMap<RespondentType, NormalizedScores> {
    snapshots
        .iter()
        .map(|(rt, merged)| {
            let values = merged
                .iter()
                .map(|(skill, m)| (skill.clone(), m.value))
                .collect();
            (*rt, values)
        })
        .collect()
}

/// A first assessment from `respondent` corroborates the profile when it
/// shares at least one skill with another context and no notable conflict
/// involves it.
fn corroborates(
    profile: &ConsolidatedProfile,
    respondent: RespondentType,
    incoming: &NormalizedScores,
) -> bool {
    let shares_skill = profile
        .respondent_snapshots
        .iter()
        .filter(|(rt, _)| **rt != respondent)
        .any(|(_, scores)| incoming.keys().any(|skill| scores.contains_key(skill)));

    let disputed = profile
        .conflicts
        .iter()
        .any(|c| c.sources.contains(&respondent));

    shares_skill && !disputed
}

fn build_events(
    profile: &ConsolidatedProfile,
    incoming: &Assessment,
    created: bool,
    previous_conflicts: Option<&[ConflictFlag]>,
) -> Vec<ProfileEvent> {
    let mut events = Vec::new();

    if created {
        events.push(ProfileEvent::ProfileCreated {
            profile_id: profile.id,
            child_name: profile.child_name.clone(),
            assessment_id: incoming.id,
            created_at: profile.created_at,
        });
    } else {
        events.push(ProfileEvent::ProfileConsolidated {
            profile_id: profile.id,
            assessment_id: incoming.id,
            respondent_type: incoming.respondent_type,
            version: profile.version,
            total_assessments: profile.counts.total_assessments,
            confidence_percentage: profile.confidence_percentage.value(),
            completeness_percentage: profile.completeness_percentage.value(),
            updated_at: profile.updated_at,
        });
    }

    if !profile.conflicts.is_empty() && previous_conflicts != Some(profile.conflicts.as_slice()) {
        events.push(ProfileEvent::ConflictsDetected {
            profile_id: profile.id,
            conflicts: profile.conflicts.clone(),
            detected_at: profile.updated_at,
        });
    }

    events
}
