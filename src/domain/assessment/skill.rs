//! Skill taxonomy names and per-skill score sets.

use serde::{Deserialize, Serialize};
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;

use crate::domain::foundation::ValidationError;

/// The eight skills of the CLP 2.0 taxonomy.
pub const CLP2_SKILLS: &[&str] = &[
    "Communication",
    "Collaboration",
    "Content",
    "Critical Thinking",
    "Creative Innovation",
    "Confidence",
    "Literacy",
    "Math",
];

/// Name of a skill in the taxonomy (e.g. "Critical Thinking").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SkillName(String);

impl SkillName {
    /// Creates a skill name, returning error if blank.
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("skill"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this skill belongs to the CLP 2.0 taxonomy.
    pub fn is_clp2(&self) -> bool {
        CLP2_SKILLS.contains(&self.0.as_str())
    }
}

impl TryFrom<String> for SkillName {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SkillName> for String {
    fn from(name: SkillName) -> Self {
        name.0
    }
}

impl fmt::Display for SkillName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-skill scores of one assessment, on the assessment's native scale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillScores(BTreeMap<SkillName, f64>);

impl SkillScores {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Builds a score set from `(name, score)` pairs.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut scores = BTreeMap::new();
        for (name, score) in pairs {
            scores.insert(SkillName::new(name)?, score);
        }
        Ok(Self(scores))
    }

    pub fn insert(&mut self, skill: SkillName, score: f64) -> Option<f64> {
        self.0.insert(skill, score)
    }

    pub fn get(&self, skill: &SkillName) -> Option<f64> {
        self.0.get(skill).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, SkillName, f64> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a SkillScores {
    type Item = (&'a SkillName, &'a f64);
    type IntoIter = btree_map::Iter<'a, SkillName, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(SkillName, f64)> for SkillScores {
    fn from_iter<T: IntoIterator<Item = (SkillName, f64)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skill_name_rejects_blank() {
        assert!(SkillName::new("").is_err());
        assert!(SkillName::new("  ").is_err());
    }

    #[test]
    fn skill_name_recognizes_clp2_taxonomy() {
        assert!(SkillName::new("Critical Thinking").unwrap().is_clp2());
        assert!(!SkillName::new("Fine Motor").unwrap().is_clp2());
    }

    #[test]
    fn skill_scores_from_pairs_keeps_last_duplicate() {
        let scores = SkillScores::from_pairs([("Math", 2.0), ("Math", 2.5)]).unwrap();
        assert_eq!(scores.len(), 1);
        assert_eq!(scores.get(&SkillName::new("Math").unwrap()), Some(2.5));
    }

    #[test]
    fn skill_scores_deserialize_from_object() {
        let scores: SkillScores =
            serde_json::from_str(r#"{"Communication": 2.5, "Literacy": 1.0}"#).unwrap();
        assert_eq!(scores.len(), 2);
        assert!(serde_json::from_str::<SkillScores>(r#"{"": 1.0}"#).is_err());
    }
}
