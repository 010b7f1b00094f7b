use serde::{Deserialize, Serialize};

/// Tuning knobs for the comparison pipeline.
///
/// Defaults carry the calibrated values; they are exposed as named fields so
/// callers can recalibrate without code changes, but the defaults should not
/// be altered casually.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Cosine similarity at or above which two sentences are the same
    /// clause (possibly reworded).
    pub threshold_same: f32,

    /// Cosine similarity at or above which two sentences are considered
    /// related at all; below this an old sentence counts as removed.
    pub threshold_any_match: f32,

    /// Similarity at or above which a same-clause pairing is a trivial
    /// rewording and reported as unchanged.
    pub trivial_similarity: f32,

    /// Modified changes above this similarity are stylistic rewrites and
    /// are dropped before dedupe.
    pub near_duplicate_similarity: f32,

    /// Minimum risk score a change with old text must reach to survive
    /// trimming.
    pub min_keep_risk: f32,

    /// Minimum risk score an addition without old text must reach to
    /// survive trimming.
    pub keep_oldless_risk: f32,

    /// Flat risk bonus applied to additions; new obligations matter more
    /// than reworded ones.
    pub added_risk_bonus: f32,

    /// Risk floor for removals of user-rights clauses.
    pub rights_removal_floor: f32,

    /// Risk score at or above which a change is labeled High.
    pub high_risk_cutoff: f32,

    /// Risk score at or above which a change is labeled Medium.
    pub medium_risk_cutoff: f32,

    /// Confidence assigned to added/removed changes (no similarity signal).
    pub default_confidence: f32,

    /// Confidence assigned to changes found by the line-based mode.
    pub basic_confidence: f32,

    /// Global cap on reported changes.
    pub max_total: usize,

    /// Per-category cap on reported changes.
    pub max_per_category: usize,

    /// Default number of theme buckets in a summary.
    pub max_themes: usize,

    /// Default number of changes kept per theme bucket.
    pub max_items_per_theme: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            threshold_same: 0.85,
            threshold_any_match: 0.60,
            trivial_similarity: 0.98,
            near_duplicate_similarity: 0.94,
            min_keep_risk: 2.0,
            keep_oldless_risk: 3.0,
            added_risk_bonus: 0.5,
            rights_removal_floor: 2.0,
            high_risk_cutoff: 2.5,
            medium_risk_cutoff: 1.5,
            default_confidence: 0.6,
            basic_confidence: 0.7,
            max_total: 25,
            max_per_category: 6,
            max_themes: 3,
            max_items_per_theme: 4,
        }
    }
}

impl EngineConfig {
    /// Validate threshold ordering and caps.
    pub fn validate(&self) -> Result<(), String> {
        if self.threshold_any_match > self.threshold_same {
            return Err(format!(
                "threshold_any_match ({}) cannot exceed threshold_same ({})",
                self.threshold_any_match, self.threshold_same
            ));
        }

        if self.threshold_same > self.trivial_similarity {
            return Err(format!(
                "threshold_same ({}) cannot exceed trivial_similarity ({})",
                self.threshold_same, self.trivial_similarity
            ));
        }

        if self.medium_risk_cutoff > self.high_risk_cutoff {
            return Err(format!(
                "medium_risk_cutoff ({}) cannot exceed high_risk_cutoff ({})",
                self.medium_risk_cutoff, self.high_risk_cutoff
            ));
        }

        if self.min_keep_risk > self.keep_oldless_risk {
            return Err(format!(
                "min_keep_risk ({}) cannot exceed keep_oldless_risk ({})",
                self.min_keep_risk, self.keep_oldless_risk
            ));
        }

        if self.max_total == 0 || self.max_per_category == 0 {
            return Err("max_total and max_per_category must be > 0".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let config = EngineConfig {
            threshold_any_match: 0.9,
            threshold_same: 0.8,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_caps_rejected() {
        let config = EngineConfig {
            max_total: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inverted_keep_thresholds_rejected() {
        let config = EngineConfig {
            min_keep_risk: 4.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
