//! Consolidation Module - Pure domain services that merge assessments into
//! a learning profile.
//!
//! # Components
//!
//! - `ScaleNormalizer` - native scale (0-5 Legacy, 0-3 CLP 2.0) to [0, 1]
//! - `WeightingTable` - (quiz type, respondent type) to weight and boost
//! - `ScoreMerger` - weighted-average merge over the union of skills
//! - `ConfidenceEstimator` - diminishing-returns confidence accumulation
//! - `CompletenessEstimator` - context coverage discounted by answer gaps
//! - `ConflictDetector` - pairwise cross-context divergence flags
//! - `SkillRanking` - strengths and growth areas
//! - `ProfileConsolidator` - orchestrates all of the above
//!
//! All functions are pure (no side effects). Persistence and concurrency
//! control live behind the `ProfileStore` port.

mod completeness;
mod confidence;
mod conflicts;
mod consolidator;
mod errors;
mod merger;
mod policy;
mod ranking;
mod scale;
mod weighting;

pub use completeness::CompletenessEstimator;
pub use confidence::{ConfidenceEstimator, ConfidenceSignals};
pub use conflicts::ConflictDetector;
pub use consolidator::{ConsolidationOutcome, ProfileConsolidator};
pub use errors::ConsolidationError;
pub use merger::{MergedScores, MergedSkill, NormalizedScores, ScoreMerger};
pub use policy::ConsolidationPolicy;
pub use ranking::SkillRanking;
pub use scale::ScaleNormalizer;
pub use weighting::{RespondentWeight, WeightRule, WeightingTable, WeightingTableError};
