//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod profile;

pub use profile::{
    ConsolidateAssessmentCommand, ConsolidateAssessmentHandler, ConsolidateAssessmentResult,
    GetProfileHandler, GetProfileQuery, ProfileView, DEFAULT_MAX_SAVE_RETRIES,
};
