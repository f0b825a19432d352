//! Progressive Profile - Consolidates learning assessments into one
//! evolving profile per child.
//!
//! Parents, teachers and other respondents each submit assessments scored on
//! the Legacy (0-5) or CLP 2.0 (0-3) scale. The consolidation engine merges
//! them into a single profile with weighted skill scores, an evidence-based
//! confidence percentage, a coverage-based completeness percentage, and
//! flags where home and school observations disagree.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
