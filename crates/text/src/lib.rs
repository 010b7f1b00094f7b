//! # Consent Text
//!
//! Text preparation for policy-document comparison.
//!
//! Policy snapshots arrive as plain text that frequently still carries
//! HTML/Markdown remnants from upstream extraction. This crate turns such
//! text into an ordered list of clean, substantive sentences:
//!
//! ```text
//! raw text
//!     │
//!     ├──> cleanup (BOM, tags, Markdown, whitespace)
//!     │
//!     ├──> segmentation (UAX #29 sentences, or line-based)
//!     │
//!     └──> noise filter (headings, boilerplate, table junk)
//! ```
//!
//! Everything here is best-effort and infallible: malformed input degrades
//! to whatever clean text can be recovered, and empty input yields an empty
//! sentence list.

mod cleanup;
mod noise;
mod segment;

pub use cleanup::{clean_line, cleanup_sentence, normalize_loose};
pub use noise::{is_noise_sentence, looks_like_heading};
pub use segment::{prepare_sentences, split_sentences, SegmentMode};
