use std::collections::HashMap;
use std::sync::Arc;

use consent_embeddings::HashedEncoder;
use consent_engine::{ChangeKind, EngineConfig, PolicyDiff, RiskLabel, summarize_themes};

fn engine() -> PolicyDiff {
    PolicyDiff::with_encoder(Arc::new(HashedEncoder::default()), EngineConfig::default())
}

const OLD_POLICY: &str = "\
We collect your email address and account name when you register for the service.\n\
We don't sell your personal data.\n\
Support requests are answered within two business days of submission.\n\
Your settings can be exported from the account dashboard at any time.\n";

const NEW_POLICY: &str = "\
We collect your email address and account name when you register for the service.\n\
We may share your usage data with advertising partners and measurement vendors.\n\
Support requests are answered within two business days of submission.\n\
Your settings can be exported from the account dashboard at any time.\n";

#[test]
fn identical_documents_yield_no_changes() {
    let engine = engine();
    let changes = engine.classify_semantic(OLD_POLICY, OLD_POLICY).unwrap();
    assert!(changes.is_empty(), "got: {changes:#?}");
}

#[test]
fn identical_large_document_yields_no_changes() {
    let engine = engine();
    let doc: String = (0..500)
        .map(|i| {
            format!(
                "We process record {i} of your profile under the service agreement terms.\n"
            )
        })
        .collect();
    let changes = engine.classify_semantic(&doc, &doc).unwrap();
    assert!(changes.is_empty(), "got {} changes", changes.len());
}

#[test]
fn empty_inputs_yield_no_changes() {
    let engine = engine();
    assert!(engine.classify_semantic("", NEW_POLICY).unwrap().is_empty());
    assert!(engine.classify_semantic(OLD_POLICY, "").unwrap().is_empty());
    assert!(engine.classify_semantic("  \n \t ", " ").unwrap().is_empty());
}

#[test]
fn repeated_calls_are_byte_identical() {
    let engine = engine();
    let first = engine.classify_semantic(OLD_POLICY, NEW_POLICY).unwrap();
    let second = engine.classify_semantic(OLD_POLICY, NEW_POLICY).unwrap();
    assert_eq!(first, second);

    let first_json = serde_json::to_string(&first).unwrap();
    let second_json = serde_json::to_string(&second).unwrap();
    assert_eq!(first_json, second_json);
}

#[test]
fn removed_no_sell_guarantee_is_flagged_high() {
    let engine = engine();
    let changes = engine.classify_semantic(OLD_POLICY, NEW_POLICY).unwrap();

    let flagged = changes
        .iter()
        .find(|c| c.old_text.as_deref().is_some_and(|t| t.contains("sell")))
        .expect("expected a change for the dropped no-sell clause");
    assert_eq!(flagged.category, "Data sharing & third parties");
    assert!(matches!(
        flagged.kind,
        ChangeKind::Removed | ChangeKind::Modified
    ));
    assert!(flagged.risk_label >= RiskLabel::Medium);
}

#[test]
fn added_sharing_clause_is_reported() {
    let engine = engine();
    let changes = engine.classify_semantic(OLD_POLICY, NEW_POLICY).unwrap();

    let added = changes
        .iter()
        .find(|c| c.kind == ChangeKind::Added)
        .expect("expected an added change");
    assert_eq!(added.category, "Data sharing & third parties");
    assert!(added.new_text.as_deref().unwrap().contains("advertising partners"));
    assert!(added.old_text.is_none());
    assert_eq!(added.similarity, None);
}

#[test]
fn heading_fragments_never_surface_as_changes() {
    let engine = engine();
    let new_with_noise = format!(
        "3.2 Data Retention\n|---|---|\n[Cookie Policy](https://example.com/cookies)\n{NEW_POLICY}"
    );
    let changes = engine.classify_semantic(OLD_POLICY, &new_with_noise).unwrap();

    for change in &changes {
        let text = change.representative_text();
        assert!(!text.contains("3.2 Data Retention"), "heading leaked: {text}");
        assert!(!text.contains("|---|"), "table junk leaked: {text}");
        assert_ne!(text, "Cookie Policy", "bare link leaked: {text}");
    }
}

#[test]
fn output_respects_global_and_category_caps() {
    let engine = engine();
    let config = EngineConfig::default();

    let mut new_doc = String::from(OLD_POLICY);
    for i in 0..40 {
        new_doc.push_str(&format!(
            "We may share your usage data with advertising partners in market {i}.\n"
        ));
    }
    for i in 0..40 {
        new_doc.push_str(&format!(
            "We record pages visited and search terms for recommendations in market {i}.\n"
        ));
    }

    let changes = engine.classify_semantic(OLD_POLICY, &new_doc).unwrap();
    assert!(changes.len() <= config.max_total);

    let mut per_category: HashMap<&str, usize> = HashMap::new();
    for change in &changes {
        *per_category.entry(change.category.as_str()).or_insert(0) += 1;
    }
    for (category, count) in per_category {
        assert!(
            count <= config.max_per_category,
            "category '{category}' exceeded cap with {count}"
        );
    }
}

#[test]
fn changes_are_sorted_by_risk_descending() {
    let engine = engine();
    let changes = engine.classify_semantic(OLD_POLICY, NEW_POLICY).unwrap();
    for pair in changes.windows(2) {
        assert!(pair[0].risk_score >= pair[1].risk_score);
    }
}

#[test]
fn risk_label_tracks_score() {
    let engine = engine();
    let config = EngineConfig::default();
    let changes = engine.classify_semantic(OLD_POLICY, NEW_POLICY).unwrap();
    for change in &changes {
        let expected = if change.risk_score >= config.high_risk_cutoff {
            RiskLabel::High
        } else if change.risk_score >= config.medium_risk_cutoff {
            RiskLabel::Medium
        } else {
            RiskLabel::Low
        };
        assert_eq!(change.risk_label, expected);
    }
}

#[test]
fn theme_summary_is_deterministic_and_capped() {
    let engine = engine();
    let changes = engine.classify_semantic(OLD_POLICY, NEW_POLICY).unwrap();

    let first = summarize_themes(&changes, 3, 4);
    let second = summarize_themes(&changes, 3, 4);
    assert_eq!(first, second);

    assert!(first.len() <= 3);
    for bucket in &first {
        assert!(bucket.items.len() <= 4);
        assert!(bucket.count >= bucket.items.len());
        for pair in bucket.items.windows(2) {
            assert!(pair[0].risk_score >= pair[1].risk_score);
        }
    }

    let sharing = first
        .iter()
        .find(|b| b.theme == "data_sharing")
        .expect("sharing changes must form a theme bucket");
    assert_eq!(sharing.title, "Data sharing / third parties");
}

#[test]
fn basic_mode_respects_caps_too() {
    let engine = PolicyDiff::new(EngineConfig::default());
    let config = EngineConfig::default();

    let old_doc: String = (0..60)
        .map(|i| format!("Clause {i}: we provide the service under the usual terms.\n"))
        .collect();
    let new_doc: String = (0..60)
        .map(|i| {
            format!("Clause {i}: we may share your usage data with advertising partners.\n")
        })
        .collect();

    let changes = engine.classify_basic(&old_doc, &new_doc);
    assert!(changes.len() <= config.max_total);

    let mut per_category: HashMap<&str, usize> = HashMap::new();
    for change in &changes {
        *per_category.entry(change.category.as_str()).or_insert(0) += 1;
    }
    for count in per_category.values() {
        assert!(*count <= config.max_per_category);
    }
}
