//! Confidence Estimator - accumulates a 0-100 evidence score with
//! diminishing returns per repeated respondent type.

use super::WeightingTable;
use crate::domain::assessment::{QuizType, RespondentType};
use crate::domain::foundation::Percentage;

/// Signals from the rest of the consolidation that shape the final step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfidenceSignals {
    /// A new respondent type agreed with the existing contexts on shared skills.
    pub corroborated: bool,
    /// The profile carries at least one high-significance conflict.
    pub high_conflict: bool,
}

/// Confidence accumulation over one weighting table.
pub struct ConfidenceEstimator<'a> {
    table: &'a WeightingTable,
    corroboration_bonus: f64,
    conflict_ceiling: f64,
}

impl<'a> ConfidenceEstimator<'a> {
    pub fn new(table: &'a WeightingTable, corroboration_bonus: f64, conflict_ceiling: f64) -> Self {
        Self {
            table,
            corroboration_bonus,
            conflict_ceiling,
        }
    }

    /// 1 for the first assessment of a type, then 1/2, 1/3, ...
    pub fn diminish_factor(same_type_count_so_far: u32) -> f64 {
        1.0 / (f64::from(same_type_count_so_far) + 1.0)
    }

    /// Boost this assessment is worth before corroboration or conflict caps.
    pub fn effective_boost(
        &self,
        respondent: RespondentType,
        quiz_type: &QuizType,
        same_type_count_so_far: u32,
    ) -> f64 {
        let raw = self.table.weight_of(quiz_type, respondent).confidence_boost;
        raw * Self::diminish_factor(same_type_count_so_far)
    }

    /// `min(100, current + effective boost)`.
    pub fn next_confidence(
        &self,
        current: Percentage,
        respondent: RespondentType,
        quiz_type: &QuizType,
        same_type_count_so_far: u32,
    ) -> Percentage {
        let boost = self.effective_boost(respondent, quiz_type, same_type_count_so_far);
        Percentage::new(current.value() + boost)
    }

    /// Apply the corroboration bonus and conflict ceiling to a candidate.
    ///
    /// The result is never below `current`: a conflict can hold confidence
    /// back but never takes earned confidence away.
    ///
    /// While a high conflict stays open, any profile already at or above the
    /// ceiling gains nothing from further assessments, so successive
    /// same-type deltas are all zero rather than strictly shrinking. The same
    /// holds once confidence reaches 100. Diminishing returns apply to the
    /// candidate from `next_confidence`, not to the settled delta.
    pub fn settle(
        &self,
        current: Percentage,
        candidate: Percentage,
        signals: ConfidenceSignals,
    ) -> Percentage {
        let mut value = candidate.value();
        if signals.corroborated {
            value += self.corroboration_bonus;
        }
        if signals.high_conflict {
            value = value.min(self.conflict_ceiling);
        }
        Percentage::new(value.max(current.value()))
    }

    /// `next_confidence` followed by `settle`.
    pub fn advance(
        &self,
        current: Percentage,
        respondent: RespondentType,
        quiz_type: &QuizType,
        same_type_count_so_far: u32,
        signals: ConfidenceSignals,
    ) -> Percentage {
        let candidate = self.next_confidence(current, respondent, quiz_type, same_type_count_so_far);
        let settled = self.settle(current, candidate, signals);
        tracing::debug!(
            respondent_type = %respondent,
            quiz_type = %quiz_type,
            same_type_count_so_far,
            current = current.value(),
            candidate = candidate.value(),
            settled = settled.value(),
            "Advanced profile confidence"
        );
        settled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn estimator(table: &WeightingTable) -> ConfidenceEstimator<'_> {
        ConfidenceEstimator::new(table, 10.0, 65.0)
    }

    #[test]
    fn diminish_factor_halves_then_thirds() {
        assert_eq!(ConfidenceEstimator::diminish_factor(0), 1.0);
        assert_eq!(ConfidenceEstimator::diminish_factor(1), 0.5);
        assert!((ConfidenceEstimator::diminish_factor(2) - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn first_assessment_gets_full_boost() {
        let table = WeightingTable::builtin();
        let next = estimator(table).next_confidence(
            Percentage::ZERO,
            RespondentType::Parent,
            &QuizType::parent_home(),
            0,
        );
        assert_eq!(next.value(), 30.0);
    }

    #[test]
    fn repeated_type_deltas_shrink() {
        let table = WeightingTable::builtin();
        let est = estimator(table);
        let quiz = QuizType::parent_home();

        let first = est.next_confidence(Percentage::ZERO, RespondentType::Parent, &quiz, 0);
        let second = est.next_confidence(first, RespondentType::Parent, &quiz, 1);
        let third = est.next_confidence(second, RespondentType::Parent, &quiz, 2);

        let d1 = first.value();
        let d2 = second.value() - first.value();
        let d3 = third.value() - second.value();
        assert!(d2 < d1);
        assert!(d3 < d2);
    }

    #[test]
    fn confidence_caps_at_100() {
        let table = WeightingTable::builtin();
        let next = estimator(table).next_confidence(
            Percentage::new(90.0),
            RespondentType::Other,
            &QuizType::general(),
            0,
        );
        assert_eq!(next, Percentage::HUNDRED);
    }

    #[test]
    fn corroboration_adds_bonus() {
        let table = WeightingTable::builtin();
        let settled = estimator(table).settle(
            Percentage::new(30.0),
            Percentage::new(70.0),
            ConfidenceSignals {
                corroborated: true,
                high_conflict: false,
            },
        );
        assert_eq!(settled.value(), 80.0);
    }

    #[test]
    fn high_conflict_caps_but_never_reduces() {
        let table = WeightingTable::builtin();
        let est = estimator(table);
        let signals = ConfidenceSignals {
            corroborated: false,
            high_conflict: true,
        };

        assert_eq!(
            est.settle(Percentage::new(30.0), Percentage::new(70.0), signals).value(),
            65.0
        );
        // Already above the ceiling: held, not lowered
        assert_eq!(
            est.settle(Percentage::new(80.0), Percentage::new(95.0), signals).value(),
            80.0
        );
    }

    #[test]
    fn open_high_conflict_flattens_repeat_deltas() {
        let table = WeightingTable::builtin();
        let est = estimator(table);
        let signals = ConfidenceSignals {
            corroborated: false,
            high_conflict: true,
        };

        let mut current = Percentage::new(65.0);
        for repeats in 1..4 {
            let next = est.advance(
                current,
                RespondentType::Teacher,
                &QuizType::teacher_classroom(),
                repeats,
                signals,
            );
            assert_eq!(next, current);
            current = next;
        }
    }
}
