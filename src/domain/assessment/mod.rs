//! Assessment module - the immutable input the engine consumes.
//!
//! An assessment is one respondent's view of a child, already scored per
//! skill by the upstream scoring step. This module only models it; it never
//! parses questionnaire answers.

mod assessment;
mod respondent;
mod scoring_version;
mod skill;

pub use assessment::Assessment;
pub use respondent::{AgeGroup, QuizType, RespondentType};
pub use scoring_version::ScoringVersion;
pub use skill::{SkillName, SkillScores, CLP2_SKILLS};
