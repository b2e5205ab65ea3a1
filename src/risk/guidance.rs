//! Static per-tier recommendations and the templated advice used when no LLM reply is available.

use super::RiskTier;

const LOW: [&str; 4] = [
    "Continue your healthy lifestyle",
    "Schedule regular check-ups",
    "Monitor environmental exposure",
    "Maintain current activity levels",
];

const MODERATE: [&str; 4] = [
    "Increase physical activity to 150+ minutes/week",
    "Consider lifestyle modifications",
    "Consult with your healthcare provider",
    "Monitor air quality in your area",
];

const HIGH: [&str; 4] = [
    "Seek immediate medical consultation",
    "Comprehensive cardiovascular assessment needed",
    "Urgent lifestyle intervention required",
    "Consider relocation if air quality is poor",
];

/// Very Low shares Low's list and Very High shares High's.
pub fn recommendations(tier: RiskTier) -> &'static [&'static str] {
    match tier {
        RiskTier::VeryLow | RiskTier::Low => &LOW,
        RiskTier::Moderate => &MODERATE,
        RiskTier::High | RiskTier::VeryHigh => &HIGH,
    }
}

fn tier_tip(tier: RiskTier) -> &'static str {
    match tier {
        RiskTier::VeryLow | RiskTier::Low => {
            "Maintain healthy lifestyle while monitoring air quality."
        }
        RiskTier::Moderate => "Increase exercise in green spaces, monitor pollution.",
        RiskTier::High | RiskTier::VeryHigh => "Prioritize indoor exercise on high pollution days.",
    }
}

fn borough_tip(borough: &str) -> Option<&'static str> {
    Some(match borough {
        "Tower Hamlets" => "High pollution - exercise in Mile End Park, avoid busy roads",
        "Camden" => "Urban environment - use Regent's Park, check air quality",
        "Westminster" => "Very high traffic - exercise early morning in St James's Park",
        "Hackney" => "Above-average pollution - use Victoria Park",
        "Richmond upon Thames" => "Excellent air quality - enjoy Richmond Park",
        "Kingston upon Thames" => "Good air quality - riverside walks ideal",
        _ => return None,
    })
}

/// One tier sentence followed by a borough tip.
pub fn fallback_advice(tier: RiskTier, borough: &str) -> String {
    match borough_tip(borough) {
        Some(tip) => format!("{} {}", tier_tip(tier), tip),
        None => format!("{} Monitor air quality in {}", tier_tip(tier), borough),
    }
}
