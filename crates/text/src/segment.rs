use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::cleanup::{clean_line, cleanup_sentence};
use crate::noise::is_noise_sentence;

/// How raw text is broken into comparable units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentMode {
    /// UAX #29 sentence boundaries. Preferred for prose.
    #[default]
    Sentences,

    /// One non-blank line = one sentence. Positional fallback used by the
    /// line-based comparison mode.
    Lines,
}

/// Split raw text into ordered, trimmed, non-empty segments.
///
/// Order is preserved: downstream alignment indices refer to positions in
/// the returned list.
#[must_use]
pub fn split_sentences(text: &str, mode: SegmentMode) -> Vec<String> {
    let unified = text.replace("\r\n", "\n").replace('\r', "\n");
    match mode {
        SegmentMode::Sentences => unified
            .unicode_sentences()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string)
            .collect(),
        SegmentMode::Lines => unified
            .lines()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string)
            .collect(),
    }
}

/// Full preparation pipeline: segment, clean each sentence, drop empties and
/// noise. This is what the semantic comparison mode feeds to alignment.
#[must_use]
pub fn prepare_sentences(text: &str, mode: SegmentMode) -> Vec<String> {
    let trimmed = clean_line(text);
    if trimmed.is_empty() {
        return Vec::new();
    }

    split_sentences(&trimmed, mode)
        .iter()
        .map(|s| cleanup_sentence(s))
        .filter(|s| !s.is_empty() && !is_noise_sentence(s))
        .collect()
}
