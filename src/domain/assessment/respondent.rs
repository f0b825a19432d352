//! Who answered an assessment and with which instrument.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Who answered the assessment.
///
/// Unknown labels are not rejected: they deserialize to [`RespondentType::Other`]
/// so a new respondent category never blocks ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RespondentType {
    Parent,
    Teacher,
    Other,
}

impl RespondentType {
    /// All respondent types in their canonical order.
    pub const ALL: [RespondentType; 3] = [Self::Parent, Self::Teacher, Self::Other];

    /// Parses a label, falling back to `Other` for anything unrecognized.
    pub fn parse_lenient(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "parent" | "guardian" => Self::Parent,
            "teacher" | "educator" => Self::Teacher,
            "other" => Self::Other,
            unknown => {
                tracing::warn!(
                    respondent_type = unknown,
                    "Unknown respondent type, treating as 'other'"
                );
                Self::Other
            }
        }
    }

    /// Wire label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Parent => "parent",
            Self::Teacher => "teacher",
            Self::Other => "other",
        }
    }

    /// The observation context this respondent speaks for.
    pub fn context_label(&self) -> &'static str {
        match self {
            Self::Parent => "home",
            Self::Teacher => "school",
            Self::Other => "other settings",
        }
    }
}

impl From<String> for RespondentType {
    fn from(label: String) -> Self {
        Self::parse_lenient(&label)
    }
}

impl From<RespondentType> for String {
    fn from(rt: RespondentType) -> Self {
        rt.as_str().to_string()
    }
}

impl fmt::Display for RespondentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which assessment instrument was used.
///
/// Kept open-ended: new quiz types arrive without code changes and are
/// weighted by the configured table's default entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct QuizType(String);

impl QuizType {
    pub const PARENT_HOME: &'static str = "parent_home";
    pub const TEACHER_CLASSROOM: &'static str = "teacher_classroom";
    pub const GENERAL: &'static str = "general";

    /// Creates a quiz type, normalizing case and surrounding whitespace.
    pub fn new(label: impl AsRef<str>) -> Self {
        Self(label.as_ref().trim().to_ascii_lowercase())
    }

    pub fn parent_home() -> Self {
        Self::new(Self::PARENT_HOME)
    }

    pub fn teacher_classroom() -> Self {
        Self::new(Self::TEACHER_CLASSROOM)
    }

    pub fn general() -> Self {
        Self::new(Self::GENERAL)
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for QuizType {
    fn from(label: String) -> Self {
        Self::new(label)
    }
}

impl From<QuizType> for String {
    fn from(qt: QuizType) -> Self {
        qt.0
    }
}

impl fmt::Display for QuizType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Age band of the child at submission time (e.g. "3-5", "6-8").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgeGroup(String);

impl AgeGroup {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn respondent_type_parses_known_labels() {
        assert_eq!(RespondentType::parse_lenient("parent"), RespondentType::Parent);
        assert_eq!(RespondentType::parse_lenient(" Teacher "), RespondentType::Teacher);
        assert_eq!(RespondentType::parse_lenient("other"), RespondentType::Other);
    }

    #[test]
    fn unknown_respondent_type_falls_back_to_other() {
        let rt: RespondentType = serde_json::from_str("\"grandparent\"").unwrap();
        assert_eq!(rt, RespondentType::Other);
    }

    #[test]
    fn respondent_type_serializes_lowercase() {
        let json = serde_json::to_string(&RespondentType::Teacher).unwrap();
        assert_eq!(json, "\"teacher\"");
    }

    #[test]
    fn quiz_type_is_case_insensitive() {
        assert_eq!(QuizType::new("Parent_Home"), QuizType::parent_home());
        let qt: QuizType = serde_json::from_str("\"  GENERAL \"").unwrap();
        assert_eq!(qt.as_str(), "general");
    }
}
