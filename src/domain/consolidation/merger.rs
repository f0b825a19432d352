//! Score Merger - weighted-average combination of skill score sets.
//!
//! All merging happens on the normalized [0, 1] scale so Legacy and CLP 2.0
//! assessments average consistently.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{ConsolidationError, ScaleNormalizer};
use crate::domain::assessment::{ScoringVersion, SkillName, SkillScores};

/// Running weighted mean of one skill.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MergedSkill {
    /// Normalized [0, 1] value.
    pub value: f64,
    pub accumulated_weight: f64,
}

/// Merge state keyed by skill.
pub type MergedScores = BTreeMap<SkillName, MergedSkill>;

/// Normalized scores of a single assessment.
pub type NormalizedScores = BTreeMap<SkillName, f64>;

/// Stateless score merging.
pub struct ScoreMerger;

impl ScoreMerger {
    /// Validate and normalize an assessment's native scores.
    ///
    /// # Errors
    /// `OutOfRangeScore` for the first skill outside the version's scale.
    pub fn normalize_scores(
        scores: &SkillScores,
        version: ScoringVersion,
    ) -> Result<NormalizedScores, ConsolidationError> {
        scores
            .iter()
            .map(|(skill, &score)| {
                ScaleNormalizer::normalize(score, version)
                    .map(|n| (skill.clone(), n))
                    .map_err(|e| e.for_skill(skill))
            })
            .collect()
    }

    /// Merge `incoming` (normalized) into `existing` with `incoming_weight`.
    ///
    /// Skills present on both sides are weight-averaged; skills on one side
    /// only are copied verbatim, keeping that side's weight so a later
    /// contribution still averages correctly.
    pub fn merge(
        existing: &MergedScores,
        incoming: &NormalizedScores,
        incoming_weight: f64,
    ) -> MergedScores {
        let mut merged = existing.clone();

        for (skill, &value) in incoming {
            let next = match merged.get(skill) {
                Some(prev) => {
                    let total = prev.accumulated_weight + incoming_weight;
                    MergedSkill {
                        value: (prev.value * prev.accumulated_weight + value * incoming_weight)
                            / total,
                        accumulated_weight: total,
                    }
                }
                None => MergedSkill {
                    value,
                    accumulated_weight: incoming_weight,
                },
            };
            merged.insert(skill.clone(), next);
        }

        merged
    }

    /// Native-scale view of a merge state.
    pub fn denormalize(merged: &MergedScores, version: ScoringVersion) -> BTreeMap<SkillName, f64> {
        merged
            .iter()
            .map(|(skill, m)| (skill.clone(), ScaleNormalizer::denormalize(m.value, version)))
            .collect()
    }
}
