//! Conflict Detector - pairwise cross-context comparison of skill scores.
//!
//! Read-only analysis: annotates, never changes scores.

use std::collections::BTreeMap;

use super::NormalizedScores;
use crate::domain::assessment::{RespondentType, SkillName};
use crate::domain::profile::{ConflictFlag, ConflictSignificance};

/// Threshold-based divergence classification.
pub struct ConflictDetector {
    medium_threshold: f64,
    high_threshold: f64,
}

impl ConflictDetector {
    pub fn new(medium_threshold: f64, high_threshold: f64) -> Self {
        Self {
            medium_threshold,
            high_threshold,
        }
    }

    /// Classify a normalized absolute difference.
    pub fn classify(&self, differential: f64) -> ConflictSignificance {
        if differential > self.high_threshold {
            ConflictSignificance::High
        } else if differential > self.medium_threshold {
            ConflictSignificance::Medium
        } else {
            ConflictSignificance::Low
        }
    }

    /// Medium and high flags for every skill scored by two or more
    /// respondent types, strongest first.
    pub fn detect(
        &self,
        scores_by_respondent: &BTreeMap<RespondentType, NormalizedScores>,
    ) -> Vec<ConflictFlag> {
        let types: Vec<&RespondentType> = scores_by_respondent.keys().collect();
        let mut flags = Vec::new();

        for (i, a) in types.iter().enumerate() {
            for b in &types[i + 1..] {
                let (a, b) = (**a, **b);
                let left = &scores_by_respondent[&a];
                let right = &scores_by_respondent[&b];

                for (skill, left_value) in left {
                    let Some(right_value) = right.get(skill) else {
                        continue;
                    };
                    let differential = (left_value - right_value).abs();
                    let significance = self.classify(differential);
                    if !significance.is_notable() {
                        continue;
                    }
                    flags.push(ConflictFlag {
                        skill: skill.clone(),
                        differential,
                        significance,
                        sources: [a, b],
                        recommendation: Some(recommendation(skill, significance, a, b)),
                    });
                }
            }
        }

        flags.sort_by(|x, y| {
            y.significance
                .cmp(&x.significance)
                .then_with(|| y.differential.total_cmp(&x.differential))
                .then_with(|| x.skill.cmp(&y.skill))
        });
        flags
    }
}

fn recommendation(
    skill: &SkillName,
    significance: ConflictSignificance,
    a: RespondentType,
    b: RespondentType,
) -> String {
    let lead = match significance {
        ConflictSignificance::High => "Significant",
        _ => "Some",
    };
    format!(
        "{} differences between {} and {} behavior noted for {}",
        lead,
        a.context_label(),
        b.context_label(),
        skill
    )
}
