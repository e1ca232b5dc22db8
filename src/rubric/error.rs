//! Rubric source errors.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading a rubric source into a grid.
///
/// These never reach scoring callers; the loader turns them into
/// [`DefaultReason::Unreadable`](super::DefaultReason::Unreadable).
#[derive(Debug, Error)]
pub enum RubricError {
    #[error("failed to read rubric {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid CSV rubric: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid JSON rubric: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported rubric layout: {reason}")]
    UnsupportedLayout { reason: String },
}
