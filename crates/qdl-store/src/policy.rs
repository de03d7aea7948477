use std::fmt;

use qdl_types::QualityScore;

/// Quality score at or above which a record belongs to the high tier.
pub const QUALITY_THRESHOLD: f64 = 0.8;

/// Admission predicate deciding which tier accepts a record.
///
/// The two predicates partition the score range exactly: a boundary score
/// of 0.8 goes to the high tier and nowhere else.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AdmissionPolicy {
    /// Accepts scores `>= 0.8`.
    HighQuality,
    /// Accepts scores `< 0.8`.
    LowQuality,
}

impl AdmissionPolicy {
    /// Returns `true` if this policy admits the given score.
    pub fn admits(&self, score: QualityScore) -> bool {
        match self {
            Self::HighQuality => score.value() >= QUALITY_THRESHOLD,
            Self::LowQuality => score.value() < QUALITY_THRESHOLD,
        }
    }
}

impl fmt::Display for AdmissionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HighQuality => write!(f, "high-quality"),
            Self::LowQuality => write!(f, "low-quality"),
        }
    }
}
