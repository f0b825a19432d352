//! Profile command and query handlers.

mod consolidate_assessment;
mod get_profile;

pub use consolidate_assessment::{
    ConsolidateAssessmentCommand, ConsolidateAssessmentHandler, ConsolidateAssessmentResult,
    DEFAULT_MAX_SAVE_RETRIES,
};
pub use get_profile::{GetProfileHandler, GetProfileQuery, ProfileView};
