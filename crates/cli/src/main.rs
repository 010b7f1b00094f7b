//! Compare two policy snapshots and print the detected changes as JSON.
//!
//! The binary is a thin wrapper: it reads two files, runs the engine, and
//! passes the result through unchanged. Fetching, caching, and scheduling
//! live elsewhere.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use consent_embeddings::{HashedEncoder, OnnxEncoder, TextEncoder};
use consent_engine::{
    AnalysisMode, AnalysisReport, EngineConfig, PolicyDiff, ThemeBucket, summarize_themes,
};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Positional line diff; no model required.
    Basic,
    /// Embedding-based sentence alignment.
    Semantic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum EncoderKind {
    /// ONNX Runtime sentence transformer from --model-dir.
    Onnx,
    /// Deterministic token-hashing encoder; no model assets needed.
    Hashed,
}

#[derive(Parser)]
#[command(
    name = "consent-diff",
    version,
    about = "Detect and rank meaningful changes between two policy document versions"
)]
struct Args {
    /// Older document snapshot.
    #[arg(long)]
    old: PathBuf,

    /// Newer document snapshot.
    #[arg(long)]
    new: PathBuf,

    #[arg(long, value_enum, default_value_t = Mode::Semantic)]
    mode: Mode,

    /// Directory holding model.onnx and tokenizer.json.
    #[arg(long, env = "CONSENT_MODEL_DIR", default_value = "./models/minilm")]
    model_dir: PathBuf,

    #[arg(long, value_enum, default_value_t = EncoderKind::Onnx)]
    encoder: EncoderKind,

    /// Override the global cap on reported changes (1-500).
    #[arg(long)]
    max_changes: Option<usize>,

    /// Append a theme summary to the output.
    #[arg(long)]
    themes: bool,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,
}

#[derive(Serialize)]
struct Output {
    #[serde(flatten)]
    report: AnalysisReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    themes: Option<Vec<ThemeBucket>>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let old_text = fs::read_to_string(&args.old)
        .with_context(|| format!("failed to read {}", args.old.display()))?;
    let new_text = fs::read_to_string(&args.new)
        .with_context(|| format!("failed to read {}", args.new.display()))?;

    let mut config = EngineConfig::default();
    if let Some(max_changes) = args.max_changes {
        config.max_total = max_changes.clamp(1, 500);
    }

    let (mode, report) = match args.mode {
        Mode::Basic => {
            let engine = PolicyDiff::new(config.clone());
            let changes = engine.classify_basic(&old_text, &new_text);
            (
                AnalysisMode::Basic,
                AnalysisReport::new(AnalysisMode::Basic, None, changes),
            )
        }
        Mode::Semantic => {
            let encoder: Arc<dyn TextEncoder> = match args.encoder {
                EncoderKind::Onnx => Arc::new(
                    OnnxEncoder::load(&args.model_dir).with_context(|| {
                        format!(
                            "no usable embedding model in {} (try --encoder hashed or --mode basic)",
                            args.model_dir.display()
                        )
                    })?,
                ),
                EncoderKind::Hashed => Arc::new(HashedEncoder::default()),
            };
            let model_name = encoder.model_name().to_string();
            let engine = PolicyDiff::with_encoder(encoder, config.clone());
            let changes = engine.classify_semantic(&old_text, &new_text)?;
            (
                AnalysisMode::Semantic,
                AnalysisReport::new(AnalysisMode::Semantic, Some(model_name), changes),
            )
        }
    };
    log::info!(
        "{:?} comparison found {} changes",
        mode,
        report.num_changes
    );

    let themes = args
        .themes
        .then(|| summarize_themes(&report.changes, config.max_themes, config.max_items_per_theme));

    let output = Output { report, themes };
    let rendered = if args.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{rendered}");

    Ok(())
}
