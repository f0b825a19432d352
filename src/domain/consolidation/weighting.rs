//! Respondent Weighting Table - (quiz type, respondent type) to merge weight
//! and confidence boost.
//!
//! The table is data, not code: a deployment can ship a versioned YAML
//! document and new quiz types pick up the table default until listed.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::assessment::{QuizType, RespondentType};
use crate::domain::foundation::ValidationError;

/// Weight and confidence boost for one kind of assessment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RespondentWeight {
    /// Relative weight in the score merge.
    pub base_weight: f64,
    /// Confidence points a first assessment of this kind adds.
    pub confidence_boost: f64,
}

impl RespondentWeight {
    pub const fn new(base_weight: f64, confidence_boost: f64) -> Self {
        Self {
            base_weight,
            confidence_boost,
        }
    }
}

/// Table row. A rule without `respondent_type` matches every respondent
/// for its quiz type; a rule naming one wins over it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightRule {
    pub quiz_type: QuizType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub respondent_type: Option<RespondentType>,
    pub base_weight: f64,
    pub confidence_boost: f64,
}

impl WeightRule {
    pub fn weight(&self) -> RespondentWeight {
        RespondentWeight::new(self.base_weight, self.confidence_boost)
    }
}

#[derive(Debug, Error)]
pub enum WeightingTableError {
    #[error("Failed to parse weighting table: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid weighting table: {0}")]
    Invalid(#[from] ValidationError),
}

/// Versioned lookup table of weights and boosts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightingTable {
    pub version: String,
    /// Applied when no rule matches the quiz type.
    pub default: RespondentWeight,
    #[serde(default)]
    pub rules: Vec<WeightRule>,
}

static BUILTIN: Lazy<WeightingTable> = Lazy::new(|| WeightingTable {
    version: "builtin-1".to_string(),
    default: RespondentWeight::new(0.5, 25.0),
    rules: vec![
        WeightRule {
            quiz_type: QuizType::parent_home(),
            respondent_type: None,
            base_weight: 0.6,
            confidence_boost: 30.0,
        },
        WeightRule {
            quiz_type: QuizType::teacher_classroom(),
            respondent_type: None,
            base_weight: 0.8,
            confidence_boost: 40.0,
        },
        WeightRule {
            quiz_type: QuizType::general(),
            respondent_type: None,
            base_weight: 1.0,
            confidence_boost: 50.0,
        },
    ],
});

impl WeightingTable {
    /// The table shipped with the engine.
    pub fn builtin() -> &'static WeightingTable {
        &BUILTIN
    }

    /// Parse and validate a YAML table document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, WeightingTableError> {
        let table: WeightingTable = serde_yaml::from_str(yaml)?;
        table.validate()?;
        Ok(table)
    }

    /// Weights must be positive and boosts within 0..=100.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_weight("default", &self.default)?;
        for rule in &self.rules {
            let field = match rule.respondent_type {
                Some(rt) => format!("rules[{}/{}]", rule.quiz_type, rt),
                None => format!("rules[{}]", rule.quiz_type),
            };
            check_weight(&field, &rule.weight())?;
        }
        Ok(())
    }

    /// Whether any rule names this quiz type.
    pub fn knows_quiz_type(&self, quiz_type: &QuizType) -> bool {
        self.rules.iter().any(|r| &r.quiz_type == quiz_type)
    }

    /// Weight for an assessment; never fails.
    ///
    /// Exact `(quiz, respondent)` rule, then quiz-only rule, then the table
    /// default with a warning.
    pub fn weight_of(&self, quiz_type: &QuizType, respondent: RespondentType) -> RespondentWeight {
        let exact = self
            .rules
            .iter()
            .find(|r| &r.quiz_type == quiz_type && r.respondent_type == Some(respondent));
        if let Some(rule) = exact {
            return rule.weight();
        }

        let quiz_only = self
            .rules
            .iter()
            .find(|r| &r.quiz_type == quiz_type && r.respondent_type.is_none());
        if let Some(rule) = quiz_only {
            return rule.weight();
        }

        tracing::warn!(
            quiz_type = %quiz_type,
            respondent_type = %respondent,
            table_version = %self.version,
            "No weighting rule for quiz type, using table default"
        );
        self.default
    }
}

impl Default for WeightingTable {
    fn default() -> Self {
        Self::builtin().clone()
    }
}

fn check_weight(field: &str, weight: &RespondentWeight) -> Result<(), ValidationError> {
    if !(weight.base_weight > 0.0) {
        return Err(ValidationError::invalid_format(
            field,
            "base_weight must be positive",
        ));
    }
    if !(0.0..=100.0).contains(&weight.confidence_boost) {
        return Err(ValidationError::invalid_format(
            field,
            "confidence_boost must be between 0 and 100",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_matches_documented_values() {
        let table = WeightingTable::builtin();
        let parent = table.weight_of(&QuizType::parent_home(), RespondentType::Parent);
        let teacher = table.weight_of(&QuizType::teacher_classroom(), RespondentType::Teacher);
        let general = table.weight_of(&QuizType::general(), RespondentType::Other);

        assert_eq!(parent, RespondentWeight::new(0.6, 30.0));
        assert_eq!(teacher, RespondentWeight::new(0.8, 40.0));
        assert_eq!(general, RespondentWeight::new(1.0, 50.0));
    }

    #[test]
    fn unknown_quiz_type_falls_back_to_default() {
        let table = WeightingTable::builtin();
        let weight = table.weight_of(&QuizType::new("summer_camp"), RespondentType::Other);
        assert_eq!(weight, RespondentWeight::new(0.5, 25.0));
        assert!(!table.knows_quiz_type(&QuizType::new("summer_camp")));
    }

    #[test]
    fn exact_respondent_rule_wins_over_quiz_rule() {
        let yaml = r#"
version: "2025-01"
default: { base_weight: 0.5, confidence_boost: 25 }
rules:
  - { quiz_type: general, base_weight: 1.0, confidence_boost: 50 }
  - { quiz_type: general, respondent_type: parent, base_weight: 0.7, confidence_boost: 35 }
"#;
        let table = WeightingTable::from_yaml_str(yaml).unwrap();

        assert_eq!(
            table.weight_of(&QuizType::general(), RespondentType::Parent),
            RespondentWeight::new(0.7, 35.0)
        );
        assert_eq!(
            table.weight_of(&QuizType::general(), RespondentType::Teacher),
            RespondentWeight::new(1.0, 50.0)
        );
        assert_eq!(table.version, "2025-01");
    }

    #[test]
    fn rejects_non_positive_weights() {
        let yaml = r#"
version: "bad"
default: { base_weight: 0.0, confidence_boost: 25 }
"#;
        assert!(matches!(
            WeightingTable::from_yaml_str(yaml),
            Err(WeightingTableError::Invalid(_))
        ));
    }

    #[test]
    fn rejects_malformed_yaml() {
        assert!(matches!(
            WeightingTable::from_yaml_str("version: [unclosed"),
            Err(WeightingTableError::Parse(_))
        ));
    }
}
