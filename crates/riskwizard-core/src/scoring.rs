//! Risk classification from a score-to-maximum ratio.

use serde::{Deserialize, Serialize};
use std::fmt;

const MEDIUM_THRESHOLD: f64 = 0.33;
const HIGH_THRESHOLD: f64 = 0.66;

/// Coarse risk bucket. Serialized with the `risk-` prefix the display layer
/// uses for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskClass {
    #[serde(rename = "risk-low")]
    Low,
    #[serde(rename = "risk-medium")]
    Medium,
    #[serde(rename = "risk-high")]
    High,
}

impl RiskClass {
    /// Classify `score / max_score` with strict `<` thresholds at 0.33 and 0.66.
    ///
    /// A zero maximum has nothing at risk and classifies as `Low`.
    pub fn classify(score: u32, max_score: u32) -> Self {
        if max_score == 0 {
            return RiskClass::Low;
        }
        let ratio = f64::from(score) / f64::from(max_score);
        if ratio < MEDIUM_THRESHOLD {
            RiskClass::Low
        } else if ratio < HIGH_THRESHOLD {
            RiskClass::Medium
        } else {
            RiskClass::High
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskClass::Low => "low",
            RiskClass::Medium => "medium",
            RiskClass::High => "high",
        }
    }
}

impl fmt::Display for RiskClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
