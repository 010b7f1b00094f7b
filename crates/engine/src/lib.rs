//! # Consent Engine
//!
//! Change detection and risk triage for legal/policy documents.
//!
//! Given two versions of a privacy policy or terms of service, the engine
//! produces a ranked, deduplicated list of changes, each carrying a
//! category, a plain-language explanation, a suggested user action, a risk
//! score and label, and a presentation theme.
//!
//! ## Pipeline
//!
//! ```text
//! old text ──┐
//!            ├──> segmentation + cleanup ──> noise filter
//! new text ──┘                                   │
//!                                                ▼
//!                              greedy nearest-neighbor alignment
//!                                                │
//!                                                ▼
//!                          rule classification ──> risk scoring
//!                                                │
//!                                                ▼
//!                              dedupe / trim ──> theme summary
//! ```
//!
//! ## Modes
//!
//! - [`PolicyDiff::classify_semantic`] — embedding-based sentence
//!   alignment; needs an injected [`consent_embeddings::TextEncoder`].
//! - [`PolicyDiff::classify_basic`] — positional line diff; no model.
//!
//! The engine is a heuristic triage aid, not a compliance verdict: it never
//! fetches documents, persists nothing, and holds no state across calls.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use consent_embeddings::HashedEncoder;
//! use consent_engine::{EngineConfig, PolicyDiff};
//!
//! let engine = PolicyDiff::with_encoder(
//!     Arc::new(HashedEncoder::default()),
//!     EngineConfig::default(),
//! );
//!
//! let changes = engine
//!     .classify_semantic(
//!         "We don't sell your personal data.",
//!         "We may share your data with advertising partners.",
//!     )
//!     .unwrap();
//! assert!(!changes.is_empty());
//! ```

mod align;
mod config;
mod dedupe;
mod error;
mod pipeline;
mod risk;
mod rules;
mod themes;
mod types;

pub use align::align_greedy;
pub use config::EngineConfig;
pub use dedupe::{dedupe_and_trim, sort_changes};
pub use error::{EngineError, Result};
pub use pipeline::PolicyDiff;
pub use risk::{base_risk, content_bump, risk_label};
pub use rules::{category, classify, Verdict};
pub use themes::{infer_theme, summarize_themes, theme_title};
pub use types::{
    Alignment, AnalysisMode, AnalysisReport, Change, ChangeKind, RiskLabel, ThemeBucket,
};
