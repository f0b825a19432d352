//! Scoring scale versions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which scoring scale an assessment (or a profile's display) uses.
///
/// CLP 2.0 (0-3) supersedes the Legacy 0-5 scale: once a profile has seen a
/// CLP 2.0 assessment it stays on CLP 2.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoringVersion {
    #[serde(rename = "clp2", alias = "CLP2", alias = "CLP 2.0")]
    Clp2,
    #[serde(rename = "legacy", alias = "Legacy")]
    Legacy,
}

impl ScoringVersion {
    /// Upper bound of the native scale.
    pub fn native_max(&self) -> f64 {
        match self {
            Self::Clp2 => 3.0,
            Self::Legacy => 5.0,
        }
    }

    /// Version a profile ends up on after merging an assessment of `incoming`.
    pub fn after_merging(self, incoming: ScoringVersion) -> ScoringVersion {
        match (self, incoming) {
            (Self::Clp2, _) | (_, Self::Clp2) => Self::Clp2,
            (Self::Legacy, Self::Legacy) => Self::Legacy,
        }
    }
}

impl fmt::Display for ScoringVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clp2 => write!(f, "CLP 2.0"),
            Self::Legacy => write!(f, "Legacy"),
        }
    }
}
