//! Embedding provider + similarity.
//!
//! - [`EmbeddingProvider`] lazily resolves one [`Embedder`] per provider (real or fallback).
//! - [`SentenceEncoder`] is the candle-backed implementation; [`ZeroEmbedder`] the fallback.
//! - [`cosine_similarity`] compares two embeddings.

/// Model selection and fallback policy.
pub mod config;
/// Device selection (CPU / Metal / CUDA).
pub mod device;
/// BERT sentence encoder.
pub mod encoder;
mod error;
/// Zero-vector fallback (and the test mock).
pub mod fallback;
mod provider;
mod similarity;
/// Tokenizer loading helpers.
pub mod utils;

#[cfg(test)]
mod tests;

pub use config::{EmbeddingBackend, EmbeddingConfig, parse_flag};
pub use encoder::SentenceEncoder;
pub use error::EmbeddingError;
#[cfg(any(test, feature = "mock"))]
pub use fallback::MockEmbedder;
pub use fallback::ZeroEmbedder;
pub use provider::EmbeddingProvider;
pub use similarity::cosine_similarity;

/// Text embedding capability.
pub trait Embedder: Send + Sync + std::fmt::Debug {
    /// One fixed-length vector per input text.
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        texts.iter().map(|text| self.embed(text)).collect()
    }

    fn dim(&self) -> usize;

    fn name(&self) -> &str;

    /// `true` for the zero-vector stand-in.
    fn is_fallback(&self) -> bool {
        false
    }
}
