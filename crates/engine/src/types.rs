use serde::{Deserialize, Serialize};

/// How a sentence pairing differs between document versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Unchanged,
    Modified,
    Removed,
    Added,
}

impl ChangeKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unchanged => "unchanged",
            Self::Modified => "modified",
            Self::Removed => "removed",
            Self::Added => "added",
        }
    }
}

/// Coarse risk tier derived from the numeric score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLabel {
    Low,
    Medium,
    High,
}

impl RiskLabel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

/// One sentence pairing produced by alignment.
///
/// Removed pairings have no new side; added pairings have no old side and
/// no similarity. Indices refer to positions in the filtered sentence lists
/// of the respective document version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alignment {
    pub old_index: Option<usize>,
    pub new_index: Option<usize>,
    pub old_text: Option<String>,
    pub new_text: Option<String>,
    pub similarity: Option<f32>,
    pub kind: ChangeKind,
}

/// A reportable difference between document versions: an alignment enriched
/// with classification, risk, and presentation fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Change {
    #[serde(rename = "type")]
    pub kind: ChangeKind,
    pub old_index: Option<usize>,
    pub new_index: Option<usize>,
    #[serde(rename = "old")]
    pub old_text: Option<String>,
    #[serde(rename = "new")]
    pub new_text: Option<String>,
    pub similarity: Option<f32>,
    pub category: String,
    pub theme: String,
    pub explanation: String,
    pub suggested_action: String,
    pub risk_score: f32,
    pub risk_label: RiskLabel,
    pub confidence: f32,
}

impl Change {
    /// The text a reader would look at to understand this change: the new
    /// side for additions and rewrites, the old side for removals.
    #[must_use]
    pub fn representative_text(&self) -> &str {
        let text = match self.kind {
            ChangeKind::Removed => self.old_text.as_deref(),
            _ => self.new_text.as_deref(),
        };
        text.unwrap_or("")
    }
}

/// A group of related changes for compact presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeBucket {
    pub theme: String,
    pub title: String,
    pub score: f32,
    pub count: usize,
    pub items: Vec<Change>,
}

/// Which comparison pipeline produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    Basic,
    Semantic,
}

/// Consumer-facing wrapper around a comparison result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub mode: AnalysisMode,
    pub model_name: Option<String>,
    pub num_changes: usize,
    pub changes: Vec<Change>,
}

impl AnalysisReport {
    #[must_use]
    pub fn new(mode: AnalysisMode, model_name: Option<String>, changes: Vec<Change>) -> Self {
        Self {
            mode,
            model_name,
            num_changes: changes.len(),
            changes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_label_ordering() {
        assert!(RiskLabel::High > RiskLabel::Medium);
        assert!(RiskLabel::Medium > RiskLabel::Low);
    }

    #[test]
    fn test_representative_text_sides() {
        let mut change = Change {
            kind: ChangeKind::Modified,
            old_index: Some(0),
            new_index: Some(0),
            old_text: Some("old clause".to_string()),
            new_text: Some("new clause".to_string()),
            similarity: Some(0.7),
            category: "Other policy change".to_string(),
            theme: "other".to_string(),
            explanation: String::new(),
            suggested_action: String::new(),
            risk_score: 0.5,
            risk_label: RiskLabel::Low,
            confidence: 0.7,
        };
        assert_eq!(change.representative_text(), "new clause");

        change.kind = ChangeKind::Removed;
        assert_eq!(change.representative_text(), "old clause");
    }

    #[test]
    fn test_change_kind_serializes_lowercase() {
        let json = serde_json::to_string(&ChangeKind::Added).unwrap();
        assert_eq!(json, "\"added\"");
    }
}
