use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use ndarray::{Array, Axis, Ix2, Ix3};
use ort::ep::CPU;
use ort::session::{builder::GraphOptimizationLevel, Session, SessionInputs};
use ort::value::{DynTensor, Tensor};
use serde::{Deserialize, Serialize};
use tokenizers::{Encoding, PaddingParams, PaddingStrategy, Tokenizer, TruncationParams};

use crate::error::{EncoderError, Result};
use crate::{l2_normalize, TextEncoder};

/// Shape parameters of a sentence-transformer export.
///
/// Defaults match the MiniLM-class models commonly used for sentence
/// similarity (384-dimensional output).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EncoderSpec {
    /// Output embedding length.
    pub dimension: usize,

    /// Token truncation limit per sentence.
    pub max_length: usize,

    /// Maximum sentences per forward pass.
    pub max_batch: usize,
}

impl Default for EncoderSpec {
    fn default() -> Self {
        Self {
            dimension: 384,
            max_length: 256,
            max_batch: 32,
        }
    }
}

/// Transformer sentence encoder on ONNX Runtime (CPU execution provider).
///
/// Expects `model.onnx` and `tokenizer.json` inside the model directory.
/// The session is guarded by a mutex so a shared encoder can be called from
/// multiple comparison threads; the encoder itself is otherwise read-only.
#[derive(Debug)]
pub struct OnnxEncoder {
    session: Mutex<Session>,
    tokenizer: Tokenizer,
    spec: EncoderSpec,
    name: String,
}

impl OnnxEncoder {
    /// Load from a model directory with the default MiniLM-class spec.
    pub fn load(model_dir: impl AsRef<Path>) -> Result<Self> {
        Self::load_with(model_dir, EncoderSpec::default())
    }

    pub fn load_with(model_dir: impl AsRef<Path>, spec: EncoderSpec) -> Result<Self> {
        let model_dir = model_dir.as_ref();
        let model_path = model_dir.join("model.onnx");
        let tokenizer_path = model_dir.join("tokenizer.json");

        if !model_path.exists() || !tokenizer_path.exists() {
            return Err(EncoderError::ModelAssets(format!(
                "expected ONNX model at {} and tokenizer at {}",
                model_path.display(),
                tokenizer_path.display()
            )));
        }

        let tokenizer = build_tokenizer(&tokenizer_path, spec.max_length)?;
        let session = build_session(&model_path)?;

        let name = model_dir
            .file_name()
            .map_or_else(|| "onnx".to_string(), |n| n.to_string_lossy().into_owned());

        log::info!(
            "Loaded ONNX sentence encoder '{}' (dim {}, max_length {}, batch {})",
            name,
            spec.dimension,
            spec.max_length,
            spec.max_batch
        );

        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
            spec,
            name,
        })
    }

    fn forward(&self, batch: &[&str]) -> Result<Vec<Vec<f32>>> {
        let inputs: Vec<String> = batch.iter().map(ToString::to_string).collect();
        let encodings = self
            .tokenizer
            .encode_batch(inputs, true)
            .map_err(|e| EncoderError::Tokenizer(format!("batch encoding failed: {e}")))?;

        if encodings.is_empty() {
            return Ok(Vec::new());
        }

        let seq_len = encodings[0].len();
        if encodings.iter().any(|e| e.len() != seq_len) {
            return Err(EncoderError::Tokenizer(
                "inconsistent sequence lengths after padding".to_string(),
            ));
        }

        let (ids, masks, type_ids, mask_rows) = flatten_encodings(&encodings, seq_len);

        let ids_tensor = make_tensor(ids, batch.len(), seq_len)?;
        let mask_tensor = make_tensor(masks, batch.len(), seq_len)?;
        let type_tensor = make_tensor(type_ids, batch.len(), seq_len)?;

        let mut available: HashMap<&str, DynTensor> = HashMap::new();
        available.insert("input_ids", ids_tensor);
        available.insert("attention_mask", mask_tensor);
        available.insert("token_type_ids", type_tensor);

        let array = {
            let mut session = self
                .session
                .lock()
                .map_err(|_| EncoderError::Runtime("ONNX session lock poisoned".to_string()))?;

            let mut feed: HashMap<String, DynTensor> = HashMap::new();
            for input in session.inputs() {
                match available.get(input.name()) {
                    Some(tensor) => {
                        feed.insert(input.name().to_string(), tensor.clone());
                    }
                    None => {
                        return Err(EncoderError::Runtime(format!(
                            "unsupported ONNX model input '{}'",
                            input.name()
                        )));
                    }
                }
            }

            let outputs = session
                .run(SessionInputs::from(feed))
                .map_err(|e| EncoderError::Runtime(format!("ONNX forward failed: {e}")))?;

            if outputs.len() == 0 {
                return Err(EncoderError::Runtime("ONNX returned no outputs".to_string()));
            }

            outputs[0]
                .try_extract_array::<f32>()
                .map_err(|e| EncoderError::Runtime(format!("failed to decode ONNX output: {e}")))?
                .to_owned()
        };

        pooled_embeddings(array, &mask_rows, self.spec.dimension)
    }
}

impl TextEncoder for OnnxEncoder {
    fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());
        for batch in texts.chunks(self.spec.max_batch) {
            results.extend(self.forward(batch)?);
        }
        Ok(results)
    }

    fn dimension(&self) -> usize {
        self.spec.dimension
    }

    fn model_name(&self) -> &str {
        &self.name
    }
}

fn build_tokenizer(path: &Path, max_length: usize) -> Result<Tokenizer> {
    // Deterministic, low-contention tokenization unless explicitly overridden.
    if !tokenizers::utils::parallelism::is_parallelism_configured() {
        tokenizers::utils::parallelism::set_parallelism(false);
    }

    let mut tokenizer = Tokenizer::from_file(path)
        .map_err(|e| EncoderError::Tokenizer(format!("tokenizer load failed: {e}")))?;
    tokenizer.with_padding(Some(PaddingParams {
        strategy: PaddingStrategy::BatchLongest,
        ..PaddingParams::default()
    }));
    tokenizer
        .with_truncation(Some(TruncationParams {
            max_length,
            ..TruncationParams::default()
        }))
        .map_err(|e| EncoderError::Tokenizer(format!("truncation setup failed: {e}")))?;
    Ok(tokenizer)
}

fn build_session(model_path: &Path) -> Result<Session> {
    Session::builder()
        .map_err(|e| EncoderError::Runtime(format!("{e}")))?
        .with_execution_providers([CPU::default().build()])
        .map_err(|e| EncoderError::Runtime(format!("failed to register CPU provider: {e}")))?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .map_err(|e| EncoderError::Runtime(format!("failed to set optimization level: {e}")))?
        .commit_from_file(model_path)
        .map_err(|e| EncoderError::Runtime(format!("failed to load ONNX model: {e}")))
}

fn make_tensor(values: Vec<i64>, rows: usize, cols: usize) -> Result<DynTensor> {
    let array = Array::from_shape_vec((rows, cols), values)
        .map_err(|e| EncoderError::Runtime(format!("tensor shape error: {e}")))?;
    Ok(Tensor::from_array(array.into_dyn())
        .map_err(|e| EncoderError::Runtime(format!("{e}")))?
        .upcast())
}

#[allow(clippy::type_complexity)]
fn flatten_encodings(
    encodings: &[Encoding],
    seq_len: usize,
) -> (Vec<i64>, Vec<i64>, Vec<i64>, Vec<Vec<i64>>) {
    let mut ids = Vec::with_capacity(encodings.len() * seq_len);
    let mut masks = Vec::with_capacity(encodings.len() * seq_len);
    let mut type_ids = Vec::with_capacity(encodings.len() * seq_len);
    let mut mask_rows = Vec::with_capacity(encodings.len());

    for encoding in encodings {
        let encoding_ids = encoding.get_ids();
        let encoding_masks = encoding.get_attention_mask();
        let encoding_types = encoding.get_type_ids();

        for idx in 0..seq_len {
            ids.push(i64::from(*encoding_ids.get(idx).unwrap_or(&0)));
            masks.push(i64::from(*encoding_masks.get(idx).unwrap_or(&0)));
            type_ids.push(i64::from(*encoding_types.get(idx).unwrap_or(&0)));
        }

        mask_rows.push(
            encoding_masks
                .iter()
                .take(seq_len)
                .map(|v| i64::from(*v))
                .collect(),
        );
    }

    (ids, masks, type_ids, mask_rows)
}

/// Turn a model output into one normalized vector per input sentence.
///
/// Sentence-transformer exports either emit pooled `[batch, dim]` output or
/// raw `[batch, tokens, dim]` hidden states; the latter gets masked mean
/// pooling.
fn pooled_embeddings(
    array: ndarray::ArrayD<f32>,
    mask_rows: &[Vec<i64>],
    expected_dimension: usize,
) -> Result<Vec<Vec<f32>>> {
    let mut out = Vec::new();
    match array.ndim() {
        2 => {
            let pooled = array
                .into_dimensionality::<Ix2>()
                .map_err(|e| EncoderError::Runtime(format!("bad output shape: {e}")))?;
            out.reserve(pooled.len_of(Axis(0)));
            for row in pooled.outer_iter() {
                let mut emb = row.to_owned().to_vec();
                ensure_dimension(&emb, expected_dimension)?;
                l2_normalize(&mut emb);
                out.push(emb);
            }
        }
        3 => {
            let hidden = array
                .into_dimensionality::<Ix3>()
                .map_err(|e| EncoderError::Runtime(format!("bad output shape: {e}")))?;
            out.reserve(hidden.len_of(Axis(0)));
            for (idx, sample) in hidden.outer_iter().enumerate() {
                let mask = mask_rows
                    .get(idx)
                    .cloned()
                    .unwrap_or_else(|| vec![1; sample.len_of(Axis(0))]);
                let mut emb = mean_pool(sample, &mask);
                ensure_dimension(&emb, expected_dimension)?;
                l2_normalize(&mut emb);
                out.push(emb);
            }
        }
        _ => {
            return Err(EncoderError::Runtime(format!(
                "unexpected ONNX output dims: {:?}",
                array.shape()
            )));
        }
    }
    Ok(out)
}

fn mean_pool(sample: ndarray::ArrayView2<'_, f32>, mask: &[i64]) -> Vec<f32> {
    if sample.is_empty() {
        return Vec::new();
    }

    let hidden = sample.len_of(Axis(1));
    let mut sum = vec![0.0f32; hidden];
    let mut count = 0.0f32;

    for (token_idx, token) in sample.outer_iter().enumerate() {
        if *mask.get(token_idx).unwrap_or(&0) == 0 {
            continue;
        }
        count += 1.0;
        for (dim, value) in token.iter().enumerate() {
            sum[dim] += value;
        }
    }

    if count == 0.0 {
        return sum;
    }

    for value in &mut sum {
        *value /= count;
    }

    sum
}

fn ensure_dimension(vec: &[f32], expected: usize) -> Result<()> {
    if vec.len() != expected {
        return Err(EncoderError::InvalidDimension {
            expected,
            actual: vec.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_assets_error() {
        let err = OnnxEncoder::load("/nonexistent/model/dir").unwrap_err();
        assert!(matches!(err, EncoderError::ModelAssets(_)));
    }

    #[test]
    fn test_mean_pool_respects_mask() {
        let hidden = Array::from_shape_vec((3, 2), vec![1.0, 2.0, 3.0, 4.0, 100.0, 100.0])
            .unwrap();
        // Third token is padding and must not contribute.
        let pooled = mean_pool(hidden.view(), &[1, 1, 0]);
        assert_eq!(pooled, vec![2.0, 3.0]);
    }

    #[test]
    fn test_ensure_dimension_mismatch() {
        let err = ensure_dimension(&[0.0; 10], 384).unwrap_err();
        assert!(matches!(
            err,
            EncoderError::InvalidDimension {
                expected: 384,
                actual: 10
            }
        ));
    }

    #[test]
    #[ignore] // Requires model assets on disk
    fn test_encode_batch_with_local_model() {
        let encoder = OnnxEncoder::load("./models/minilm").unwrap();
        let vecs = encoder
            .encode_batch(&["We collect your email address."])
            .unwrap();
        assert_eq!(vecs.len(), 1);
        assert_eq!(vecs[0].len(), encoder.dimension());
    }
}
