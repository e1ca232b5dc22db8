use super::Embedder;
use super::error::EmbeddingError;

/// Deterministic stand-in that maps every input to a zero vector.
///
/// Semantic similarity against a zero vector is always `0.0`, so scoring stays neutral.
#[derive(Debug, Clone)]
pub struct ZeroEmbedder {
    dim: usize,
}

impl ZeroEmbedder {
    pub const NAME: &'static str = "zero-fallback";

    pub fn new(dim: usize) -> Self {
        Self { dim }
    }
}

impl Embedder for ZeroEmbedder {
    fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Ok(vec![0.0; self.dim])
    }

    fn dim(&self) -> usize {
        self.dim
    }

    fn name(&self) -> &str {
        Self::NAME
    }

    fn is_fallback(&self) -> bool {
        true
    }
}

/// Bag-of-words hashing embedder for tests: shared words give positive similarity.
#[cfg(any(test, feature = "mock"))]
#[derive(Debug, Clone)]
pub struct MockEmbedder {
    dim: usize,
}

#[cfg(any(test, feature = "mock"))]
impl MockEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }
}

#[cfg(any(test, feature = "mock"))]
impl Embedder for MockEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        use std::hash::{DefaultHasher, Hash, Hasher};

        let mut v = vec![0.0f32; self.dim];
        if self.dim == 0 {
            return Ok(v);
        }
        for token in crate::text::tokenize(text) {
            let mut hasher = DefaultHasher::new();
            token.hash(&mut hasher);
            let idx = (hasher.finish() % self.dim as u64) as usize;
            v[idx] += 1.0;
        }

        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut v {
                *x /= norm;
            }
        }
        Ok(v)
    }

    fn dim(&self) -> usize {
        self.dim
    }

    fn name(&self) -> &str {
        "mock-bag-of-words"
    }
}
