//! Profile module - the consolidated learning profile aggregate.
//!
//! # Domain Invariants
//!
//! 1. `total_assessments` equals the sum of the per-respondent counters
//! 2. `consolidated_scores` covers every skill ever reported
//! 3. Confidence never decreases as assessments are added
//! 4. `data_sources` is append-only, one entry per merged assessment
//! 5. Once a CLP 2.0 assessment is merged, the profile stays on CLP 2.0
//! 6. Profile version only increases

mod conflict;
mod events;
mod profile;

pub use conflict::{ConflictFlag, ConflictSignificance};
pub use events::ProfileEvent;
pub use profile::{AssessmentCounts, ConsolidatedProfile, DataSource, ProfileVersion};
