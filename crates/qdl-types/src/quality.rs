use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Quality score assigned to a record at ingestion, constrained to `[0, 1]`.
///
/// Construction validates the range, so a `QualityScore` held anywhere in
/// the system is always well-formed. The score is immutable for the life of
/// a record; updates replace payload and metadata but never the score.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct QualityScore(f64);

impl QualityScore {
    /// Create a score, rejecting values outside `[0, 1]` or non-finite.
    pub fn new(value: f64) -> Result<Self, TypeError> {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(TypeError::ScoreOutOfRange(value));
        }
        Ok(Self(value))
    }

    /// The raw score value.
    pub fn value(&self) -> f64 {
        self.0
    }

    /// IEEE-754 bit pattern, used for canonical hashing.
    pub fn to_bits(&self) -> u64 {
        self.0.to_bits()
    }
}

impl TryFrom<f64> for QualityScore {
    type Error = TypeError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<QualityScore> for f64 {
    fn from(score: QualityScore) -> Self {
        score.0
    }
}

impl fmt::Display for QualityScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_range() {
        assert!(QualityScore::new(0.0).is_ok());
        assert!(QualityScore::new(0.8).is_ok());
        assert!(QualityScore::new(1.0).is_ok());
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(QualityScore::new(-0.1).is_err());
        assert!(QualityScore::new(1.1).is_err());
        assert!(QualityScore::new(f64::NAN).is_err());
        assert!(QualityScore::new(f64::INFINITY).is_err());
    }

    #[test]
    fn ordering() {
        let low = QualityScore::new(0.3).unwrap();
        let high = QualityScore::new(0.9).unwrap();
        assert!(low < high);
    }

    #[test]
    fn serde_rejects_out_of_range() {
        let ok: Result<QualityScore, _> = serde_json::from_str("0.5");
        assert!(ok.is_ok());
        let bad: Result<QualityScore, _> = serde_json::from_str("2.5");
        assert!(bad.is_err());
    }

    #[test]
    fn display_three_decimals() {
        let score = QualityScore::new(0.8).unwrap();
        assert_eq!(format!("{score}"), "0.800");
    }
}
