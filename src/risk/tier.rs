//! Maps the positive-class probability onto five named tiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lower bounds of Low, Moderate, High and Very High; each bound is inclusive.
pub const TIER_THRESHOLDS: [f64; 4] = [0.2, 0.4, 0.6, 0.8];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskTier {
    #[serde(rename = "Very Low")]
    VeryLow,
    Low,
    Moderate,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl RiskTier {
    pub const ALL: [RiskTier; 5] = [
        RiskTier::VeryLow,
        RiskTier::Low,
        RiskTier::Moderate,
        RiskTier::High,
        RiskTier::VeryHigh,
    ];

    pub fn from_probability(p: f64) -> Self {
        let [low, moderate, high, very_high] = TIER_THRESHOLDS;
        if p < low {
            RiskTier::VeryLow
        } else if p < moderate {
            RiskTier::Low
        } else if p < high {
            RiskTier::Moderate
        } else if p < very_high {
            RiskTier::High
        } else {
            RiskTier::VeryHigh
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskTier::VeryLow => "Very Low",
            RiskTier::Low => "Low",
            RiskTier::Moderate => "Moderate",
            RiskTier::High => "High",
            RiskTier::VeryHigh => "Very High",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_are_inclusive_below() {
        assert_eq!(RiskTier::from_probability(0.0), RiskTier::VeryLow);
        assert_eq!(RiskTier::from_probability(0.199), RiskTier::VeryLow);
        assert_eq!(RiskTier::from_probability(0.2), RiskTier::Low);
        assert_eq!(RiskTier::from_probability(0.4), RiskTier::Moderate);
        assert_eq!(RiskTier::from_probability(0.6), RiskTier::High);
        assert_eq!(RiskTier::from_probability(0.8), RiskTier::VeryHigh);
        assert_eq!(RiskTier::from_probability(1.0), RiskTier::VeryHigh);
    }

    #[test]
    fn tiers_are_monotonic() {
        let mut last = RiskTier::VeryLow;
        for i in 0..=100 {
            let tier = RiskTier::from_probability(i as f64 / 100.0);
            assert!(tier >= last);
            last = tier;
        }
    }

    #[test]
    fn serializes_with_spaced_labels() {
        assert_eq!(serde_json::to_string(&RiskTier::VeryHigh).unwrap(), "\"Very High\"");
        for tier in RiskTier::ALL {
            let json = serde_json::to_string(&tier).unwrap();
            assert_eq!(json, format!("\"{}\"", tier.label()));
        }
    }
}
