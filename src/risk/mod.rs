//! Risk tiers and the guidance attached to each tier.

mod guidance;
mod tier;

pub use guidance::{fallback_advice, recommendations};
pub use tier::{RiskTier, TIER_THRESHOLDS};
