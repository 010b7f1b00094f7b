use crate::error::Result;
use crate::{l2_normalize, TextEncoder};

/// Model-free encoder that embeds a sentence as the normalized sum of
/// per-token hash vectors.
///
/// Cosine similarity between two such embeddings tracks token overlap:
/// identical sentences score 1.0, heavy rewording scores near 0.0, and a
/// sentence extended by a few words lands in between. That makes this
/// backend a usable stand-in for threshold-driven tests without shipping
/// model weights.
#[derive(Clone, Debug)]
pub struct HashedEncoder {
    dimension: usize,
}

impl Default for HashedEncoder {
    fn default() -> Self {
        Self::new(256)
    }
}

impl HashedEncoder {
    #[must_use]
    pub const fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn token_vector(token: &str, dimension: usize) -> Vec<f32> {
        let mut state =
            fnv1a_64(token.as_bytes()) ^ (dimension as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
        let mut vec = Vec::with_capacity(dimension);
        for _ in 0..dimension {
            let bits = splitmix64(&mut state);
            let high = (bits >> 32) as u32;
            let mantissa = high >> 9;
            let unit = f32::from_bits(0x3f80_0000 | mantissa) - 1.0;
            vec.push(unit.mul_add(2.0, -1.0));
        }
        vec
    }

    fn embed(&self, text: &str) -> Vec<f32> {
        let mut sum = vec![0.0f32; self.dimension];
        let lowered = text.to_lowercase();
        for token in lowered.split(|c: char| !c.is_alphanumeric()) {
            if token.is_empty() {
                continue;
            }
            for (dim, value) in Self::token_vector(token, self.dimension).iter().enumerate() {
                sum[dim] += value;
            }
        }
        l2_normalize(&mut sum);
        sum
    }
}

impl TextEncoder for HashedEncoder {
    fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed(t)).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        "hashed"
    }
}

fn fnv1a_64(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

const fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cosine_similarity;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_identical_sentences_max_similarity() {
        let enc = HashedEncoder::default();
        let vecs = enc
            .encode_batch(&["We collect your email address.", "We collect your email address."])
            .unwrap();
        let sim = cosine_similarity(&vecs[0], &vecs[1]);
        assert!(sim > 0.999, "sim = {sim}");
    }

    #[test]
    fn test_determinism() {
        let enc = HashedEncoder::default();
        let a = enc.encode_batch(&["We retain data for 12 months."]).unwrap();
        let b = enc.encode_batch(&["We retain data for 12 months."]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_unrelated_sentences_low_similarity() {
        let enc = HashedEncoder::default();
        let vecs = enc
            .encode_batch(&[
                "Billing occurs monthly through the payment provider.",
                "Giraffes roam widely across African savannas today.",
            ])
            .unwrap();
        let sim = cosine_similarity(&vecs[0], &vecs[1]);
        assert!(sim < 0.4, "sim = {sim}");
    }

    #[test]
    fn test_extended_sentence_intermediate_similarity() {
        let enc = HashedEncoder::default();
        let vecs = enc
            .encode_batch(&[
                "We collect your email address.",
                "We collect your email address and phone number.",
            ])
            .unwrap();
        let sim = cosine_similarity(&vecs[0], &vecs[1]);
        assert!(sim > 0.6 && sim < 0.98, "sim = {sim}");
    }

    #[test]
    fn test_vectors_are_normalized() {
        let enc = HashedEncoder::new(64);
        let vecs = enc.encode_batch(&["We process personal data."]).unwrap();
        let norm: f32 = vecs[0].iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
        assert_eq!(vecs[0].len(), 64);
    }

    #[test]
    fn test_empty_text_zero_vector() {
        let enc = HashedEncoder::new(16);
        let vecs = enc.encode_batch(&[""]).unwrap();
        assert!(vecs[0].iter().all(|v| *v == 0.0));
    }
}
