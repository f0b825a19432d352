//! Cross-context conflict annotations.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::assessment::{RespondentType, SkillName};

/// How strongly two respondent types disagree about a skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictSignificance {
    Low,
    Medium,
    High,
}

impl ConflictSignificance {
    /// Whether a flag of this significance is recorded on the profile.
    pub fn is_notable(&self) -> bool {
        !matches!(self, Self::Low)
    }
}

impl fmt::Display for ConflictSignificance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
        }
    }
}

/// Two respondent types scored the same skill very differently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictFlag {
    pub skill: SkillName,
    /// Absolute difference on the normalized [0, 1] scale.
    pub differential: f64,
    pub significance: ConflictSignificance,
    pub sources: [RespondentType; 2],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

impl ConflictFlag {
    pub fn is_high(&self) -> bool {
        self.significance == ConflictSignificance::High
    }

    /// Whether this flag compares the two given respondent types, in either order.
    pub fn involves(&self, a: RespondentType, b: RespondentType) -> bool {
        (self.sources[0] == a && self.sources[1] == b)
            || (self.sources[0] == b && self.sources[1] == a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn significance_orders_low_to_high() {
        assert!(ConflictSignificance::Low < ConflictSignificance::Medium);
        assert!(ConflictSignificance::Medium < ConflictSignificance::High);
        assert!(!ConflictSignificance::Low.is_notable());
        assert!(ConflictSignificance::High.is_notable());
    }

    #[test]
    fn involves_ignores_order() {
        let flag = ConflictFlag {
            skill: SkillName::new("Confidence").unwrap(),
            differential: 0.6,
            significance: ConflictSignificance::High,
            sources: [RespondentType::Parent, RespondentType::Teacher],
            recommendation: None,
        };
        assert!(flag.involves(RespondentType::Teacher, RespondentType::Parent));
        assert!(!flag.involves(RespondentType::Parent, RespondentType::Other));
        assert!(flag.is_high());
    }
}
