//! Tunable constants of the consolidation pipeline.

use serde::{Deserialize, Serialize};

use super::WeightingTable;
use crate::domain::foundation::ValidationError;

/// Every knob the consolidator reads. Defaults reproduce the documented
/// behavior: one context near 60% complete, two near 90%.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsolidationPolicy {
    #[serde(default)]
    pub weighting: WeightingTable,

    /// Confidence points for a new respondent type that agrees with the rest.
    #[serde(default = "default_corroboration_bonus")]
    pub corroboration_bonus: f64,

    /// Highest confidence reachable while a high conflict is open.
    #[serde(default = "default_conflict_confidence_ceiling")]
    pub conflict_confidence_ceiling: f64,

    /// Completeness points for 1, 2, 3+ distinct respondent types.
    #[serde(default = "default_context_points")]
    pub context_points: Vec<f64>,

    /// Completeness multiplier when no questions were answered.
    #[serde(default = "default_answer_quality_floor")]
    pub answer_quality_floor: f64,

    /// Normalized difference above which a conflict is medium.
    #[serde(default = "default_medium_conflict_threshold")]
    pub medium_conflict_threshold: f64,

    /// Normalized difference above which a conflict is high.
    #[serde(default = "default_high_conflict_threshold")]
    pub high_conflict_threshold: f64,

    /// Upper bound on strengths and growth areas each.
    #[serde(default = "default_ranking_size")]
    pub ranking_size: usize,
}

impl ConsolidationPolicy {
    pub fn with_weighting(mut self, weighting: WeightingTable) -> Self {
        self.weighting = weighting;
        self
    }

    /// Validate policy values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.weighting.validate()?;

        if !(0.0..=100.0).contains(&self.corroboration_bonus) {
            return Err(ValidationError::invalid_format(
                "corroboration_bonus",
                "must be between 0 and 100",
            ));
        }
        if !(0.0..=100.0).contains(&self.conflict_confidence_ceiling) {
            return Err(ValidationError::invalid_format(
                "conflict_confidence_ceiling",
                "must be between 0 and 100",
            ));
        }
        if self.context_points.is_empty() {
            return Err(ValidationError::empty_field("context_points"));
        }
        let ascending = self.context_points.windows(2).all(|w| w[0] <= w[1]);
        let in_range = self
            .context_points
            .iter()
            .all(|p| (0.0..=100.0).contains(p));
        if !ascending || !in_range {
            return Err(ValidationError::invalid_format(
                "context_points",
                "must be ascending values between 0 and 100",
            ));
        }
        if !(0.0..=1.0).contains(&self.answer_quality_floor) {
            return Err(ValidationError::invalid_format(
                "answer_quality_floor",
                "must be between 0 and 1",
            ));
        }
        if !(0.0 < self.medium_conflict_threshold
            && self.medium_conflict_threshold < self.high_conflict_threshold
            && self.high_conflict_threshold < 1.0)
        {
            return Err(ValidationError::invalid_format(
                "conflict thresholds",
                "require 0 < medium < high < 1",
            ));
        }
        Ok(())
    }
}

impl Default for ConsolidationPolicy {
    fn default() -> Self {
        Self {
            weighting: WeightingTable::default(),
            corroboration_bonus: default_corroboration_bonus(),
            conflict_confidence_ceiling: default_conflict_confidence_ceiling(),
            context_points: default_context_points(),
            answer_quality_floor: default_answer_quality_floor(),
            medium_conflict_threshold: default_medium_conflict_threshold(),
            high_conflict_threshold: default_high_conflict_threshold(),
            ranking_size: default_ranking_size(),
        }
    }
}

fn default_corroboration_bonus() -> f64 {
    10.0
}

fn default_conflict_confidence_ceiling() -> f64 {
    65.0
}

fn default_context_points() -> Vec<f64> {
    vec![60.0, 90.0, 95.0]
}

fn default_answer_quality_floor() -> f64 {
    0.5
}

fn default_medium_conflict_threshold() -> f64 {
    0.2
}

fn default_high_conflict_threshold() -> f64 {
    0.4
}

fn default_ranking_size() -> usize {
    3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_is_valid() {
        assert!(ConsolidationPolicy::default().validate().is_ok());
    }

    #[test]
    fn rejects_inverted_conflict_thresholds() {
        let policy = ConsolidationPolicy {
            medium_conflict_threshold: 0.5,
            high_conflict_threshold: 0.4,
            ..Default::default()
        };
        assert!(policy.validate().is_err());
    }

    #[test]
    fn rejects_descending_context_points() {
        let policy = ConsolidationPolicy {
            context_points: vec![90.0, 60.0],
            ..Default::default()
        };
        assert!(policy.validate().is_err());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let policy: ConsolidationPolicy =
            serde_json::from_str(r#"{"corroboration_bonus": 5}"#).unwrap();
        assert_eq!(policy.corroboration_bonus, 5.0);
        assert_eq!(policy.context_points, vec![60.0, 90.0, 95.0]);
        assert_eq!(policy.weighting.version, "builtin-1");
    }
}
