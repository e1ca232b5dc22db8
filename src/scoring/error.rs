use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::embedding::EmbeddingError;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    /// Rubric preparation failed; concurrent callers waiting on the same path share `source`.
    #[error("failed to prepare rubric {path}: {source}")]
    Prepare {
        path: PathBuf,
        #[source]
        source: Arc<EmbeddingError>,
    },

    #[error("embedder returned {actual} vectors for {expected} rubric descriptions")]
    EmbeddingCountMismatch { expected: usize, actual: usize },
}

impl ScoringError {
    /// `true` when no embedding model could be initialized and fallback is disabled.
    pub fn is_initialization_failure(&self) -> bool {
        let source = match self {
            ScoringError::Embedding(e) => e,
            ScoringError::Prepare { source, .. } => source.as_ref(),
            ScoringError::EmbeddingCountMismatch { .. } => return false,
        };
        matches!(source, EmbeddingError::InitializationFailed { .. })
    }
}
