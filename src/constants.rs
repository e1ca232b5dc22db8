//! Cross-cutting, shared constants.
//!
//! Scoring defaults live here so the config layer, the engine and the tests agree on them.

/// Output dimension of the MiniLM family of sentence encoders (and of the zero-vector fallback).
pub const DEFAULT_EMBEDDING_DIM: usize = 384;

pub const DEFAULT_MAX_SEQ_LEN: usize = 256;

pub const DEFAULT_EMBEDDING_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";

/// Candidate models tried after the desired one, smallest first.
pub const PREFERRED_EMBEDDING_MODELS: &[&str] = &[
    "sentence-transformers/paraphrase-MiniLM-L3-v2",
    "sentence-transformers/all-MiniLM-L12-v2",
    "sentence-transformers/all-MiniLM-L6-v2",
];

pub const DEFAULT_MODEL_DIR: &str = "./models";

pub const DEFAULT_KEYWORD_WEIGHT: f64 = 0.4;
pub const DEFAULT_SEMANTIC_WEIGHT: f64 = 0.6;
pub const DEFAULT_LENGTH_PENALTY_UNDER_MIN: f64 = -10.0;
pub const DEFAULT_LENGTH_PENALTY_OVER_MAX: f64 = -5.0;

/// Minimum fuzzy ratio (0-100) for a keyword to count as found.
pub const DEFAULT_FUZZY_THRESHOLD: f64 = 85.0;

/// Used as the weight denominator when a rubric's weights sum to zero.
pub const FALLBACK_TOTAL_WEIGHT: f64 = 100.0;

pub const DEFAULT_RUBRIC_PATH: &str = "data/rubric.csv";

/// Rows scanned when searching a rubric grid for its header row.
pub const HEADER_SCAN_ROWS: usize = 10;

/// A header row must mention at least this many required concepts.
pub const HEADER_MIN_CONCEPTS: usize = 2;

pub const SCORE_MIN: f64 = 0.0;
pub const SCORE_MAX: f64 = 100.0;
