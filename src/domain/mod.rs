//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, percentages, errors)
//! - `assessment` - Incoming assessments, skills, respondent and scale taxonomy
//! - `profile` - Consolidated learning profile aggregate and its events
//! - `consolidation` - Pure domain services that merge assessments into profiles

pub mod assessment;
pub mod consolidation;
pub mod foundation;
pub mod profile;
