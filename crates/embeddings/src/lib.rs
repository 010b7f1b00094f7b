//! # Consent Embeddings
//!
//! Sentence-embedding capability for semantic policy comparison.
//!
//! The comparison engine never loads a model itself; it is handed a
//! [`TextEncoder`] and treats it as a read-only collaborator. Two backends
//! are provided:
//!
//! - [`OnnxEncoder`] — a transformer sentence encoder running on ONNX
//!   Runtime (CPU execution provider) with `tokenizers` preprocessing and
//!   masked mean pooling. Deterministic for identical input and model
//!   weights.
//! - [`HashedEncoder`] — a model-free token-hashing encoder. Deterministic
//!   and dependency-free; used in tests and environments without model
//!   assets. Similarity degrades to token overlap, which is exactly what
//!   the engine's threshold tests need.

mod error;
mod hashed;
mod onnx;

pub use error::{EncoderError, Result};
pub use hashed::HashedEncoder;
pub use onnx::{EncoderSpec, OnnxEncoder};

/// Batch sentence-embedding contract consumed by the comparison engine.
///
/// Implementations must be deterministic: identical input and identical
/// model weights produce identical vectors. All returned vectors are
/// L2-normalized and of length [`TextEncoder::dimension`].
pub trait TextEncoder: Send + Sync {
    /// Embed a batch of sentences, one vector per input, in input order.
    fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;

    /// Fixed output vector length.
    fn dimension(&self) -> usize;

    /// Human-readable backend identifier for reports and logs.
    fn model_name(&self) -> &str;
}

/// Cosine similarity between two vectors. Returns 0.0 for mismatched
/// lengths or zero-norm inputs.
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

pub(crate) fn l2_normalize(vec: &mut [f32]) {
    let norm = vec.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm == 0.0 {
        return;
    }
    for value in vec {
        *value /= norm;
    }
}
