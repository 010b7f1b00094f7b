use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::types::{Change, ThemeBucket};

/// Map a category plus surrounding text onto a coarse presentation theme.
#[must_use]
pub fn infer_theme(category: &str, text: &str) -> &'static str {
    let c = category.to_lowercase();
    let t = text.to_lowercase();

    if c.contains("sharing") || c.contains("third") || t.contains("sell") || t.contains("broker") {
        return "data_sharing";
    }
    if c.contains("tracking") || c.contains("profil") || t.contains("cookie") || t.contains("pixel")
    {
        return "tracking";
    }
    if c.contains("retention") || c.contains("storage") || t.contains("retain") {
        return "retention";
    }
    if c.contains("rights") || c.contains("controls") || t.contains("opt") || t.contains("delete") {
        return "rights";
    }
    if c.contains("collection") || t.contains("collect") || t.contains("receive") {
        return "collection";
    }
    if c.contains("security") || t.contains("encrypt") || t.contains("2fa") {
        return "security";
    }
    if c.contains("billing") || t.contains("subscription") || t.contains("fee") {
        return "billing";
    }
    if c.contains("purpose") || c.contains("legal") || t.contains("advertising") || t.contains("analytics")
    {
        return "purpose";
    }

    "other"
}

/// Display title for a theme key.
#[must_use]
pub fn theme_title(theme: &str) -> &'static str {
    match theme {
        "data_sharing" => "Data sharing / third parties",
        "tracking" => "Tracking / profiling",
        "retention" => "Data retention",
        "rights" => "User rights & controls",
        "collection" => "Data collection",
        "purpose" => "Purpose / legal basis",
        "security" => "Security measures",
        "billing" => "Billing / payments",
        _ => "Other",
    }
}

/// Bucket changes by theme for compact presentation.
///
/// A bucket's score rewards one scary change over many mild ones: the
/// maximum risk in the bucket plus a small size term capped at ten items.
/// Output is deterministic: themes sort by score descending with the theme
/// key as tie-break, items by risk descending with category as tie-break.
#[must_use]
pub fn summarize_themes(
    changes: &[Change],
    max_themes: usize,
    max_items_per_theme: usize,
) -> Vec<ThemeBucket> {
    if changes.is_empty() || max_themes == 0 {
        return Vec::new();
    }

    let mut grouped: BTreeMap<&str, Vec<&Change>> = BTreeMap::new();
    for change in changes {
        let theme = if change.theme.is_empty() {
            infer_theme(&change.category, change.representative_text())
        } else {
            change.theme.as_str()
        };
        grouped.entry(theme).or_default().push(change);
    }

    let mut buckets: Vec<ThemeBucket> = grouped
        .into_iter()
        .map(|(theme, mut items)| {
            items.sort_by(|a, b| {
                b.risk_score
                    .partial_cmp(&a.risk_score)
                    .unwrap_or(Ordering::Equal)
                    .then_with(|| a.category.cmp(&b.category))
            });

            let max_risk = items
                .iter()
                .map(|c| c.risk_score)
                .fold(0.0f32, f32::max);
            let score = max_risk + 0.15 * items.len().min(10) as f32;

            ThemeBucket {
                theme: theme.to_string(),
                title: theme_title(theme).to_string(),
                score,
                count: items.len(),
                items: items
                    .into_iter()
                    .take(max_items_per_theme)
                    .cloned()
                    .collect(),
            }
        })
        .collect();

    buckets.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.theme.cmp(&b.theme))
    });
    buckets.truncate(max_themes);
    buckets
}
