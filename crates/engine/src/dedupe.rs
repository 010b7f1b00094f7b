use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use consent_text::{is_noise_sentence, normalize_loose};

use crate::config::EngineConfig;
use crate::types::Change;

/// Stable signature used to collapse near-identical changes.
fn signature(change: &Change) -> String {
    let text: String = normalize_loose(change.representative_text())
        .chars()
        .take(220)
        .collect();
    format!("{}|{}|{}", change.kind.as_str(), change.category, text)
}

/// Ranking order for reported changes: risk descending, category name
/// ascending on ties. Keeps output byte-stable across runs.
pub fn sort_changes(changes: &mut [Change]) {
    changes.sort_by(|a, b| {
        b.risk_score
            .partial_cmp(&a.risk_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.category.cmp(&b.category))
    });
}

/// A change survives trimming when it is risky enough to be worth reading.
/// Additions with no old text are held to a stricter bar; they are easy to
/// over-report.
fn survives_risk_floor(change: &Change, config: &EngineConfig) -> bool {
    if change.old_text.is_none() {
        change.risk_score >= config.keep_oldless_risk
    } else {
        change.risk_score >= config.min_keep_risk
    }
}

/// Modified pairings above the near-duplicate similarity are stylistic
/// rewrites, not substance.
fn is_stylistic_rewrite(change: &Change, config: &EngineConfig) -> bool {
    change
        .similarity
        .is_some_and(|sim| sim > config.near_duplicate_similarity)
}

/// Final volume control: drop stylistic rewrites and low-value changes,
/// collapse duplicate signatures, then enforce per-category and global caps
/// over the risk-sorted list.
#[must_use]
pub fn dedupe_and_trim(changes: Vec<Change>, config: &EngineConfig) -> Vec<Change> {
    let before = changes.len();

    let mut survivors: Vec<Change> = changes
        .into_iter()
        .filter(|ch| !is_stylistic_rewrite(ch, config))
        .filter(|ch| survives_risk_floor(ch, config))
        .filter(|ch| !is_noise_sentence(ch.representative_text()))
        .collect();

    sort_changes(&mut survivors);

    let mut seen: HashSet<String> = HashSet::new();
    let mut per_category: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<Change> = Vec::new();

    for change in survivors {
        let sig = signature(&change);
        if !seen.insert(sig) {
            continue;
        }

        let count = per_category.entry(change.category.clone()).or_insert(0);
        *count += 1;
        if *count > config.max_per_category {
            continue;
        }

        out.push(change);
        if out.len() >= config.max_total {
            break;
        }
    }

    log::debug!("Trimmed {} raw changes down to {}", before, out.len());
    out
}
