use std::collections::HashSet;

use consent_embeddings::{cosine_similarity, TextEncoder};
use consent_text::normalize_loose;

use crate::config::EngineConfig;
use crate::error::Result;
use crate::types::{Alignment, ChangeKind};

/// Greedy nearest-neighbor alignment between two sentence lists.
///
/// Each old sentence is paired with its most similar new sentence (ties
/// broken by first occurrence), then bucketed by similarity thresholds:
/// same clause, reworded clause, or removed. New sentences never chosen as
/// a best match are reported as added.
///
/// Greedy per-old-sentence matching trades global optimality for O(n*m)
/// simplicity and determinism; policy edits are mostly local, so this is a
/// deliberate fit. Large block reordering can surface as removed+added
/// pairs instead of a move, which is acceptable here.
pub fn align_greedy(
    old_sentences: &[String],
    new_sentences: &[String],
    encoder: &dyn TextEncoder,
    config: &EngineConfig,
) -> Result<Vec<Alignment>> {
    if old_sentences.is_empty() || new_sentences.is_empty() {
        return Ok(Vec::new());
    }

    let old_refs: Vec<&str> = old_sentences.iter().map(String::as_str).collect();
    let new_refs: Vec<&str> = new_sentences.iter().map(String::as_str).collect();

    let old_vectors = encoder.encode_batch(&old_refs)?;
    let new_vectors = encoder.encode_batch(&new_refs)?;

    log::debug!(
        "Aligning {} old sentences against {} new sentences",
        old_sentences.len(),
        new_sentences.len()
    );

    let mut consumed: HashSet<usize> = HashSet::new();
    let mut alignments = Vec::with_capacity(old_sentences.len());

    for (i, old_vec) in old_vectors.iter().enumerate() {
        // Strictly-greater comparison keeps the lowest index on ties.
        let mut best_j = 0;
        let mut best_sim = f32::MIN;
        for (j, new_vec) in new_vectors.iter().enumerate() {
            let sim = cosine_similarity(old_vec, new_vec);
            if sim > best_sim {
                best_sim = sim;
                best_j = j;
            }
        }

        let old = &old_sentences[i];
        let new = &new_sentences[best_j];

        if best_sim >= config.threshold_same {
            let kind = if old == new || is_trivial_change(old, new, best_sim, config) {
                ChangeKind::Unchanged
            } else {
                ChangeKind::Modified
            };
            consumed.insert(best_j);
            alignments.push(Alignment {
                old_index: Some(i),
                new_index: Some(best_j),
                old_text: Some(old.clone()),
                new_text: Some(new.clone()),
                similarity: Some(best_sim),
                kind,
            });
        } else if best_sim >= config.threshold_any_match {
            consumed.insert(best_j);
            alignments.push(Alignment {
                old_index: Some(i),
                new_index: Some(best_j),
                old_text: Some(old.clone()),
                new_text: Some(new.clone()),
                similarity: Some(best_sim),
                kind: ChangeKind::Modified,
            });
        } else {
            alignments.push(Alignment {
                old_index: Some(i),
                new_index: None,
                old_text: Some(old.clone()),
                new_text: None,
                similarity: Some(best_sim),
                kind: ChangeKind::Removed,
            });
        }
    }

    for (j, new) in new_sentences.iter().enumerate() {
        if !consumed.contains(&j) {
            alignments.push(Alignment {
                old_index: None,
                new_index: Some(j),
                old_text: None,
                new_text: Some(new.clone()),
                similarity: None,
                kind: ChangeKind::Added,
            });
        }
    }

    Ok(alignments)
}

/// Punctuation, casing, or sub-threshold wording differences do not count
/// as a reportable change.
fn is_trivial_change(old: &str, new: &str, similarity: f32, config: &EngineConfig) -> bool {
    if old.is_empty() || new.is_empty() {
        return false;
    }

    if similarity >= config.trivial_similarity {
        return true;
    }

    normalize_loose(old) == normalize_loose(new)
}
