use once_cell::sync::Lazy;
use regex::Regex;

use crate::cleanup::cleanup_sentence;

/// Tokens whose presence marks a fragment as a real policy clause rather
/// than a label.
const CLAUSE_MARKERS: &[&str] = &[
    "we", "your", "you", "may", "will", "must", "can", "collect", "share", "process", "retain",
    "store", "use", "disclose", "transfer", "sell", "delete", "access", "opt", "object", "provide",
];

/// Verbs (including auxiliaries) that distinguish a sentence from a
/// Title-Case heading.
const VERB_MARKERS: &[&str] = &[
    "is", "are", "was", "were", "be", "been", "being", "have", "has", "had", "do", "does", "did",
    "may", "might", "must", "can", "could", "should", "will", "would", "collect", "use", "share",
    "process", "retain", "store", "provide", "disclose", "transfer", "sell", "delete", "access",
    "opt", "object",
];

/// Nouns that dominate section labels in policy documents.
const HEADING_NOUNS: &[&str] = &[
    "information",
    "interactions",
    "account",
    "content",
    "communication",
    "definitions",
    "overview",
    "service providers",
    "third-party",
    "third parties",
    "purchase",
    "payments",
    "billing",
];

const POLICY_VERBS: &[&str] = &[
    "collect", "use", "share", "retain", "process", "store", "sell", "disclose", "transfer",
    "provide",
];

const BOILERPLATE_PHRASES: &[&str] = &[
    "this content should be read in conjunction",
    "read in conjunction with",
    "for more information",
    "see our privacy policy",
    "see our policy",
    "in conjunction with the rest of our privacy policy",
];

static NUMBERED_SECTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+(\.\d+)*\s+\S+").expect("valid regex"));
static ALPHA_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z]+").expect("valid regex"));
static ALPHA_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z][A-Za-z\-]+").expect("valid regex"));
static LONE_MD_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[[^\]]+\]\([^)]+\)$").expect("valid regex"));
static DASH_BRACKET: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-{3,}\]").expect("valid regex"));
static TABLE_SEPARATOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\|?\s*:?-{2,}:?\s*(\|\s*:?-{2,}:?\s*)+\|?\s*$").expect("valid regex")
});

/// Keep short fragments only when they clearly read as a clause: at least
/// six alphabetic words, or at least one clause-marker token.
fn has_minimum_substance(s: &str) -> bool {
    let words: Vec<String> = ALPHA_WORD
        .find_iter(s)
        .map(|m| m.as_str().to_lowercase())
        .collect();
    if words.len() >= 6 {
        return true;
    }
    words.iter().any(|w| CLAUSE_MARKERS.contains(&w.as_str()))
}

/// True when a sentence is probably a section heading or label rather than
/// an actual clause.
#[must_use]
pub fn looks_like_heading(s: &str) -> bool {
    let t = s.trim();
    if t.is_empty() {
        return true;
    }

    let low = t.to_lowercase();

    if !has_minimum_substance(t) {
        return true;
    }

    if BOILERPLATE_PHRASES.iter().any(|p| low.contains(p)) {
        return true;
    }

    let word_count = t.split_whitespace().count();

    if NUMBERED_SECTION.is_match(t) && word_count <= 14 {
        return true;
    }

    if t.ends_with(':') && word_count <= 14 {
        return true;
    }

    if word_count <= 3 {
        return true;
    }

    let low_words: Vec<String> = ALPHA_WORD
        .find_iter(&low)
        .map(|m| m.as_str().to_string())
        .collect();
    let has_verb = low_words
        .iter()
        .any(|w| VERB_MARKERS.contains(&w.as_str()));

    if !has_verb {
        let alpha_tokens: Vec<&str> = ALPHA_TOKEN.find_iter(t).map(|m| m.as_str()).collect();
        if !alpha_tokens.is_empty() {
            let title_like = alpha_tokens
                .iter()
                .filter(|w| w.chars().next().is_some_and(char::is_uppercase))
                .count() as f32
                / alpha_tokens.len() as f32;
            if title_like >= 0.6 && word_count <= 10 {
                return true;
            }
        }
    }

    if word_count <= 12
        && HEADING_NOUNS.iter().any(|h| low.contains(h))
        && !POLICY_VERBS.iter().any(|v| low.contains(v))
    {
        return true;
    }

    false
}

/// True when a sentence would pollute classification: markup debris, bare
/// links, cross-reference boilerplate, or heading-like labels.
///
/// Safe to apply repeatedly; a sentence that survives once survives again.
#[must_use]
pub fn is_noise_sentence(s: &str) -> bool {
    let raw = s.trim();
    if raw.is_empty() {
        return true;
    }

    let t = cleanup_sentence(raw);
    if t.is_empty() {
        return true;
    }

    let low = t.to_lowercase();
    let word_count = t.split_whitespace().count();

    if t.len() <= 3 {
        return true;
    }

    if t.chars().all(|c| "-*_[]() <>|:`".contains(c)) {
        return true;
    }

    if LONE_MD_LINK.is_match(raw) {
        return true;
    }

    if (t.starts_with("* ") || t.starts_with("- ")) && word_count < 5 {
        return true;
    }

    if raw.contains("](https://") && word_count < 6 {
        return true;
    }

    if (low.contains("cookies policy")
        || low.contains("/policies/cookies")
        || low.contains("/terms/")
        || low.contains("/policies/"))
        && word_count < 12
    {
        return true;
    }

    if DASH_BRACKET.is_match(raw) || TABLE_SEPARATOR.is_match(raw) {
        return true;
    }

    looks_like_heading(&t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbered_heading_is_noise() {
        assert!(is_noise_sentence("3.2 Data Retention"));
        assert!(is_noise_sentence("1 Introduction"));
    }

    #[test]
    fn test_trailing_colon_heading_is_noise() {
        assert!(is_noise_sentence("Information we collect from you:"));
    }

    #[test]
    fn test_title_case_label_is_noise() {
        assert!(is_noise_sentence("Your Account And Profile Information Overview"));
    }

    #[test]
    fn test_heading_noun_without_verb_is_noise() {
        assert!(is_noise_sentence("Payments and billing for subscribers"));
    }

    #[test]
    fn test_boilerplate_is_noise() {
        assert!(is_noise_sentence(
            "This content should be read in conjunction with the rest of our Privacy Policy."
        ));
    }

    #[test]
    fn test_table_separator_is_noise() {
        assert!(is_noise_sentence("|---|---|"));
        assert!(is_noise_sentence("| :--- | ---: |"));
    }

    #[test]
    fn test_lone_link_is_noise() {
        assert!(is_noise_sentence("[Cookie Policy](https://example.com/cookies)"));
    }

    #[test]
    fn test_short_list_marker_is_noise() {
        assert!(is_noise_sentence("- your email"));
    }

    #[test]
    fn test_punctuation_only_is_noise() {
        assert!(is_noise_sentence("----"));
        assert!(is_noise_sentence("* * *"));
    }

    #[test]
    fn test_real_clause_is_kept() {
        assert!(!is_noise_sentence(
            "We collect your email address and phone number when you register."
        ));
        assert!(!is_noise_sentence(
            "We may share your usage data with advertising partners."
        ));
    }

    #[test]
    fn test_noise_filter_is_idempotent() {
        let kept = "We retain your personal data for as long as your account remains active.";
        assert!(!is_noise_sentence(kept));
        let cleaned = cleanup_sentence(kept);
        assert!(!is_noise_sentence(&cleaned));
    }

    #[test]
    fn test_minimum_substance_clause_markers() {
        // Short, but carries a clause marker.
        assert!(has_minimum_substance("We collect data"));
        // Short label with no markers.
        assert!(!has_minimum_substance("Data Retention"));
    }
}
