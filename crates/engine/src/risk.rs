use consent_text::normalize_loose;

use crate::config::EngineConfig;
use crate::types::RiskLabel;

/// Category-driven base score. Matching is by category substring so related
/// category variants score alike.
#[must_use]
pub fn base_risk(category: &str) -> f32 {
    let cat = category.to_lowercase();

    if cat.contains("data sharing") || cat.contains("third parties") || cat.contains("advertisers")
    {
        return 3.0;
    }
    // Safeguard categories also mention profiling; match them first.
    if cat.contains("profiling limitations") || cat.contains("safeguards") {
        return 0.7;
    }
    if cat.contains("tracking") || cat.contains("location") || cat.contains("profiling") {
        return 2.5;
    }
    if cat.contains("data retention") || cat.contains("storage") {
        return 2.2;
    }
    if cat.contains("user rights") || cat.contains("controls") {
        return 2.2;
    }
    if cat.contains("data collection expanded") {
        return 2.0;
    }
    if cat.contains("purpose") || cat.contains("legal basis") {
        return 1.8;
    }
    if cat.contains("billing") || cat.contains("financial") {
        return 1.8;
    }
    if cat.contains("security") {
        return 1.5;
    }
    0.5
}

/// Token groups that amplify risk regardless of category. Scanned over the
/// loosely-normalized combined old+new text; bumps are additive and
/// independent.
#[must_use]
pub fn content_bump(text: &str) -> f32 {
    let t = normalize_loose(text);
    let tokens: Vec<&str> = t.split_whitespace().collect();

    let mut bump = 0.0;

    if t.contains("advertis")
        || t.contains("third part")
        || t.contains("partner")
        || t.contains("data broker")
        || tokens.iter().any(|w| *w == "ad" || *w == "ads")
    {
        bump += 0.5;
    }

    if t.contains("affiliate")
        || t.contains("group companies")
        || tokens
            .iter()
            .any(|w| matches!(*w, "combine" | "combined" | "combining" | "across"))
    {
        bump += 0.5;
    }

    if t.contains("share for advertis")
        || t.contains("profiling")
        || t.contains("inference")
        || tokens
            .iter()
            .any(|w| matches!(*w, "sell" | "selling" | "sold" | "infer"))
    {
        bump += 0.7;
    }

    bump
}

/// Pure mapping from numeric score to coarse tier.
#[must_use]
pub fn risk_label(score: f32, config: &EngineConfig) -> RiskLabel {
    if score >= config.high_risk_cutoff {
        RiskLabel::High
    } else if score >= config.medium_risk_cutoff {
        RiskLabel::Medium
    } else {
        RiskLabel::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_risk_table() {
        assert_eq!(base_risk("Data sharing & third parties"), 3.0);
        assert_eq!(base_risk("Tracking, analytics & profiling"), 2.5);
        assert_eq!(base_risk("Data retention & storage"), 2.2);
        assert_eq!(base_risk("User rights & controls"), 2.2);
        assert_eq!(base_risk("Data collection expanded"), 2.0);
        assert_eq!(base_risk("Purpose & legal basis"), 1.8);
        assert_eq!(base_risk("Billing & financial terms"), 1.8);
        assert_eq!(base_risk("Security & safety measures"), 1.5);
        assert_eq!(base_risk("Profiling limitations & safeguards"), 0.7);
        assert_eq!(base_risk("Other policy change"), 0.5);
    }

    #[test]
    fn test_sharing_outranks_everything() {
        let sharing = base_risk("Data sharing & third parties");
        for cat in [
            "Tracking, analytics & profiling",
            "Data retention & storage",
            "User rights & controls",
            "Data collection expanded",
            "Other policy change",
        ] {
            assert!(sharing > base_risk(cat));
        }
    }

    #[test]
    fn test_content_bumps_are_additive() {
        let none = content_bump("we improved the wording of this clause");
        assert_eq!(none, 0.0);

        let one = content_bump("we work with advertising partners");
        assert!((one - 0.5).abs() < 1e-6);

        let all = content_bump(
            "we may sell data combined across affiliates to advertising partners for profiling",
        );
        assert!((all - 1.7).abs() < 1e-6);
    }

    #[test]
    fn test_sale_bump_monotonicity() {
        // Identical text except for a sale/profiling trigger: the trigger
        // version must never score lower.
        let base = "we share usage information with measurement vendors";
        let with_trigger = "we share usage information with measurement vendors for profiling";
        assert!(content_bump(with_trigger) >= content_bump(base));
        assert!(content_bump(with_trigger) - content_bump(base) >= 0.7 - 1e-6);
    }

    #[test]
    fn test_bump_does_not_fire_on_substring_words() {
        // "address" contains "ad" but is not an advertising token.
        assert_eq!(content_bump("we store your street address"), 0.0);
    }

    #[test]
    fn test_risk_label_cutoffs() {
        let config = EngineConfig::default();
        assert_eq!(risk_label(2.5, &config), RiskLabel::High);
        assert_eq!(risk_label(2.49, &config), RiskLabel::Medium);
        assert_eq!(risk_label(1.5, &config), RiskLabel::Medium);
        assert_eq!(risk_label(1.49, &config), RiskLabel::Low);
        assert_eq!(risk_label(0.0, &config), RiskLabel::Low);
    }
}
