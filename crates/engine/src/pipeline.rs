use std::sync::Arc;

use consent_embeddings::TextEncoder;
use consent_text::{clean_line, cleanup_sentence, is_noise_sentence, prepare_sentences, SegmentMode};

use crate::align::align_greedy;
use crate::config::EngineConfig;
use crate::dedupe::dedupe_and_trim;
use crate::error::{EngineError, Result};
use crate::risk::{base_risk, content_bump, risk_label};
use crate::rules::{category, classify};
use crate::themes::infer_theme;
use crate::types::{Alignment, Change, ChangeKind};

/// The comparison engine. Stateless per call: every comparison is a pure
/// function of the two input texts (plus model weights), so one engine can
/// serve concurrent callers.
///
/// The embedding backend is an explicit constructor argument. An engine
/// built without one still supports the line-based mode; the semantic mode
/// reports [`EngineError::ModelUnavailable`] instead of silently degrading.
pub struct PolicyDiff {
    encoder: Option<Arc<dyn TextEncoder>>,
    config: EngineConfig,
}

impl PolicyDiff {
    /// Engine without an embedding backend; only the line-based mode works.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            encoder: None,
            config,
        }
    }

    /// Engine with an injected embedding backend.
    #[must_use]
    pub fn with_encoder(encoder: Arc<dyn TextEncoder>, config: EngineConfig) -> Self {
        Self {
            encoder: Some(encoder),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Name of the configured embedding backend, if any.
    #[must_use]
    pub fn model_name(&self) -> Option<&str> {
        self.encoder.as_ref().map(|e| e.model_name())
    }

    /// Line-position comparison: no embeddings, each surviving differing
    /// line becomes one classified change. Positional by construction, so
    /// inserting a line early in the document shifts everything below it.
    #[must_use]
    pub fn classify_basic(&self, old_text: &str, new_text: &str) -> Vec<Change> {
        if clean_line(old_text).is_empty() || clean_line(new_text).is_empty() {
            return Vec::new();
        }

        let mut changes = Vec::new();
        for (idx, (old_line, new_line)) in old_text.lines().zip(new_text.lines()).enumerate() {
            let old_clean = clean_line(old_line);
            let new_clean = clean_line(new_line);
            if old_clean == new_clean {
                continue;
            }

            let verdict = classify(&old_clean, &new_clean);
            let joined = format!("{old_clean} {new_clean}");
            let score = base_risk(&verdict.category) + content_bump(&joined);

            changes.push(Change {
                kind: ChangeKind::Modified,
                old_index: Some(idx),
                new_index: Some(idx),
                old_text: Some(old_clean),
                new_text: Some(new_clean),
                similarity: None,
                theme: infer_theme(&verdict.category, &joined).to_string(),
                category: verdict.category,
                explanation: verdict.explanation,
                suggested_action: verdict.suggested_action,
                risk_score: score,
                risk_label: risk_label(score, &self.config),
                confidence: self.config.basic_confidence,
            });
        }

        log::debug!("Line-based comparison produced {} raw changes", changes.len());
        dedupe_and_trim(changes, &self.config)
    }

    /// Full semantic comparison: segmentation, noise suppression, greedy
    /// alignment, classification, risk scoring, and trimming.
    ///
    /// Blank input on either side is a valid, common case (first snapshot)
    /// and yields an empty change list rather than an error.
    pub fn classify_semantic(&self, old_text: &str, new_text: &str) -> Result<Vec<Change>> {
        let encoder = self.encoder.as_ref().ok_or(EngineError::ModelUnavailable)?;

        if clean_line(old_text).is_empty() || clean_line(new_text).is_empty() {
            return Ok(Vec::new());
        }

        let old_sentences = prepare_sentences(old_text, SegmentMode::Sentences);
        let new_sentences = prepare_sentences(new_text, SegmentMode::Sentences);

        if old_sentences.is_empty() || new_sentences.is_empty() {
            return Ok(Vec::new());
        }

        let alignments = align_greedy(
            &old_sentences,
            &new_sentences,
            encoder.as_ref(),
            &self.config,
        )?;

        let changes: Vec<Change> = alignments
            .iter()
            .filter_map(|a| self.enrich_alignment(a))
            .collect();

        Ok(dedupe_and_trim(changes, &self.config))
    }

    /// Turn one non-unchanged alignment into a classified change, or drop
    /// it when its surviving text is noise.
    fn enrich_alignment(&self, alignment: &Alignment) -> Option<Change> {
        if alignment.kind == ChangeKind::Unchanged {
            return None;
        }

        // Cleanup can reveal new noise, so both sides get a second pass.
        let old_clean = cleanup_sentence(alignment.old_text.as_deref().unwrap_or(""));
        let new_clean = cleanup_sentence(alignment.new_text.as_deref().unwrap_or(""));

        let representative = match alignment.kind {
            ChangeKind::Removed => &old_clean,
            _ => &new_clean,
        };
        if is_noise_sentence(representative) {
            return None;
        }

        let (verdict, scored_text, base, confidence, old_text, new_text) = match alignment.kind {
            ChangeKind::Modified => {
                let verdict = classify(&old_clean, &new_clean);
                let joined = format!("{old_clean} {new_clean}").trim().to_string();
                let base = base_risk(&verdict.category);
                let confidence = alignment
                    .similarity
                    .unwrap_or(self.config.default_confidence);
                (
                    verdict,
                    joined,
                    base,
                    confidence,
                    Some(old_clean.clone()),
                    Some(new_clean.clone()),
                )
            }
            ChangeKind::Added => {
                let verdict = classify("", &new_clean);
                let base = base_risk(&verdict.category) + self.config.added_risk_bonus;
                (
                    verdict,
                    new_clean.clone(),
                    base,
                    self.config.default_confidence,
                    None,
                    Some(new_clean.clone()),
                )
            }
            ChangeKind::Removed => {
                let verdict = classify(&old_clean, "");
                let mut base = base_risk(&verdict.category);
                // Losing a right is inherently risky, whatever the table says.
                if verdict.category == category::RIGHTS {
                    base = base.max(self.config.rights_removal_floor);
                }
                (
                    verdict,
                    old_clean.clone(),
                    base,
                    self.config.default_confidence,
                    Some(old_clean.clone()),
                    None,
                )
            }
            ChangeKind::Unchanged => unreachable!("filtered above"),
        };

        let score = base + content_bump(&scored_text);

        Some(Change {
            kind: alignment.kind,
            old_index: alignment.old_index,
            new_index: alignment.new_index,
            old_text,
            new_text,
            similarity: alignment.similarity,
            theme: infer_theme(&verdict.category, &scored_text).to_string(),
            category: verdict.category,
            explanation: verdict.explanation,
            suggested_action: verdict.suggested_action,
            risk_score: score,
            risk_label: risk_label(score, &self.config),
            confidence,
        })
    }
}
