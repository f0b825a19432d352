//! Scale Normalizer - maps native-scale scores onto [0, 1] and back.

use super::ConsolidationError;
use crate::domain::assessment::ScoringVersion;

/// Stateless conversion between a version's native scale and [0, 1].
pub struct ScaleNormalizer;

impl ScaleNormalizer {
    /// Native score to [0, 1].
    ///
    /// # Errors
    /// `OutOfRangeScore` when the score is NaN or outside `0..=native_max`.
    pub fn normalize(score: f64, version: ScoringVersion) -> Result<f64, ConsolidationError> {
        let max = version.native_max();
        if !(0.0..=max).contains(&score) {
            return Err(ConsolidationError::OutOfRangeScore {
                skill: None,
                score,
                max,
            });
        }
        Ok(score / max)
    }

    /// [0, 1] back onto the version's native scale.
    pub fn denormalize(score01: f64, version: ScoringVersion) -> f64 {
        score01.clamp(0.0, 1.0) * version.native_max()
    }

    /// Re-express a native score of `from` on the scale of `to`.
    pub fn convert(
        score: f64,
        from: ScoringVersion,
        to: ScoringVersion,
    ) -> Result<f64, ConsolidationError> {
        Ok(Self::denormalize(Self::normalize(score, from)?, to))
    }
}
