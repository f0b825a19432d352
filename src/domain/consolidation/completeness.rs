//! Completeness Estimator - how many observation contexts the profile covers,
//! discounted by unanswered questions.
//!
//! Each represented respondent type contributes the step its context adds to
//! the coverage points (60, then +30, then +5 by default), scaled by the
//! answer quality of that type's most complete assessment. The best-answered
//! contexts take the largest steps. Adding a respondent type or repeating one
//! can therefore never lower the result.

use std::collections::BTreeMap;

use crate::domain::assessment::RespondentType;
use crate::domain::foundation::Percentage;

/// Context coverage scoring.
pub struct CompletenessEstimator<'a> {
    /// Points for 1, 2, 3+ distinct respondent types.
    context_points: &'a [f64],
    /// Quality multiplier when no questions were answered.
    answer_quality_floor: f64,
}

impl<'a> CompletenessEstimator<'a> {
    pub fn new(context_points: &'a [f64], answer_quality_floor: f64) -> Self {
        Self {
            context_points,
            answer_quality_floor,
        }
    }

    /// Points for the number of represented contexts before quality discount.
    pub fn coverage_points(&self, distinct_contexts: usize) -> f64 {
        if distinct_contexts == 0 || self.context_points.is_empty() {
            return 0.0;
        }
        let idx = distinct_contexts.min(self.context_points.len()) - 1;
        self.context_points[idx]
    }

    /// Multiplier in `[floor, 1]` for one assessment's answer completeness.
    pub fn answer_quality_factor(&self, answer_completeness: f64) -> f64 {
        let answered = answer_completeness.clamp(0.0, 1.0);
        self.answer_quality_floor + (1.0 - self.answer_quality_floor) * answered
    }

    /// Rounded completeness from the best answer completeness seen for each
    /// represented respondent type.
    pub fn completeness(&self, best_answers: &BTreeMap<RespondentType, f64>) -> Percentage {
        let mut qualities: Vec<f64> = best_answers
            .values()
            .map(|c| self.answer_quality_factor(*c))
            .collect();
        qualities.sort_by(|a, b| b.total_cmp(a));

        let total: f64 = qualities
            .iter()
            .enumerate()
            .map(|(i, quality)| {
                let step = self.coverage_points(i + 1) - self.coverage_points(i);
                step * quality
            })
            .sum();
        Percentage::new(total.min(100.0).round())
    }
}
