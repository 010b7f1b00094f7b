use once_cell::sync::Lazy;
use regex::Regex;

static BR_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<br\s*/?>").expect("valid regex"));
static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));
static MD_LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]+)\]\([^)]+\)").expect("valid regex"));
static HEADING_HASHES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s{0,3}#{1,6}\s+").expect("valid regex"));
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));
static QUOTE_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new("[\"'`\u{2018}\u{2019}\u{201C}\u{201D}]").expect("valid regex"));
static SOFT_PUNCT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.,;:!?()\-\[\]]").expect("valid regex"));

/// Remove byte-order marks and surrounding whitespace from a single line.
#[must_use]
pub fn clean_line(s: &str) -> String {
    s.replace('\u{feff}', "").trim().to_string()
}

/// Fold text into a loose, punctuation- and case-insensitive form.
///
/// Used for trivial-change detection, dedupe signatures, and sign-sensitive
/// phrase matching ("we don't sell..." must match regardless of curly vs
/// straight apostrophes).
#[must_use]
pub fn normalize_loose(text: &str) -> String {
    let t = text.to_lowercase();
    let t = QUOTE_CHARS.replace_all(&t, "");
    let t = SOFT_PUNCT.replace_all(&t, " ");
    let t = WHITESPACE_RUN.replace_all(&t, " ");
    t.trim().to_string()
}

fn strip_html(text: &str) -> String {
    let t = BR_TAG.replace_all(text, "\n");
    HTML_TAG.replace_all(&t, " ").into_owned()
}

fn strip_markdown(text: &str) -> String {
    let t = MD_LINK.replace_all(text, "$1");
    let t = t
        .replace("**", " ")
        .replace("__", " ")
        .replace('*', " ")
        .replace('_', " ");
    let t = HEADING_HASHES.replace(&t, "");
    t.replace('`', " ")
}

/// True for pipe-dominated fragments (table rows, separator debris) that
/// carry almost no alphanumeric content.
fn is_pipe_junk(text: &str) -> bool {
    if !text.contains('|') {
        return false;
    }
    let alnum = text.chars().filter(|c| c.is_alphanumeric()).count();
    let pipes = text.matches('|').count();
    if alnum <= 2 && pipes >= 1 {
        return true;
    }
    pipes >= 3 && text.split_whitespace().count() <= 6 && alnum <= 8
}

/// Normalize one sentence for comparison: strip BOM/HTML/Markdown, collapse
/// whitespace, and suppress markup-table fragments entirely.
///
/// Returns an empty string when nothing substantive remains.
#[must_use]
pub fn cleanup_sentence(text: &str) -> String {
    let t = clean_line(text);
    if t.is_empty() {
        return String::new();
    }

    let t = strip_html(&t);
    let t = strip_markdown(&t);
    let t = WHITESPACE_RUN.replace_all(&t, " ").trim().to_string();
    if t.is_empty() {
        return String::new();
    }

    if is_pipe_junk(&t) {
        return String::new();
    }

    t
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_clean_line_strips_bom() {
        assert_eq!(clean_line("\u{feff}  hello  "), "hello");
    }

    #[test]
    fn test_cleanup_resolves_markdown_links() {
        assert_eq!(
            cleanup_sentence("See [our policy](https://example.com/policy) for details."),
            "See our policy for details."
        );
    }

    #[test]
    fn test_cleanup_strips_html_tags() {
        assert_eq!(
            cleanup_sentence("We collect <b>usage data</b>.<br>More below."),
            "We collect usage data . More below."
        );
    }

    #[test]
    fn test_cleanup_strips_emphasis_and_heading_hashes() {
        assert_eq!(
            cleanup_sentence("## We **may** share _your_ data."),
            "We may share your data."
        );
    }

    #[test]
    fn test_cleanup_drops_table_separator() {
        assert_eq!(cleanup_sentence("|---|---|"), "");
        assert_eq!(cleanup_sentence("| a | b |"), "");
    }

    #[test]
    fn test_cleanup_keeps_pipe_in_real_sentence() {
        let s = "We share data with partners | including analytics providers and advertisers.";
        assert!(!cleanup_sentence(s).is_empty());
    }

    #[test]
    fn test_cleanup_empty_input() {
        assert_eq!(cleanup_sentence(""), "");
        assert_eq!(cleanup_sentence("   \t  "), "");
    }

    #[test]
    fn test_normalize_loose_quotes_and_punctuation() {
        assert_eq!(
            normalize_loose("We don\u{2019}t sell your personal data."),
            normalize_loose("We don't sell your personal data")
        );
    }

    #[test]
    fn test_normalize_loose_case_insensitive() {
        assert_eq!(normalize_loose("We Collect DATA"), "we collect data");
    }
}
