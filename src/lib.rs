//! OratioScore library crate (used by the server and integration tests).
//!
//! Scores a spoken-introduction transcript against a weighted rubric.
//!
//! # Pipeline
//!
//! 1. [`RubricLoader`] reads the rubric (CSV or JSON), falling back to a built-in default.
//! 2. [`ScoringEngine::prepare`] embeds each criterion description once per rubric path.
//! 3. [`ScoringEngine::score`] embeds the transcript, matches keywords with
//!    [`KeywordMatcher`], applies length penalties and combines everything into a
//!    [`ScoreResult`].
//! 4. The result can be rendered as JSON or as ZON ([`ZonEncoder`]).
//!
//! ## Public API Surface
//! - [`Config`], [`ScoringWeights`], [`ConfigError`] - Environment configuration
//! - [`EmbeddingProvider`], [`Embedder`], [`cosine_similarity`] - Sentence embeddings
//! - [`Rubric`], [`Criterion`], [`RubricOutcome`], [`DefaultReason`] - Rubric schema and loading
//! - [`ScoringEngine`], [`ScoreResult`], [`CriterionScore`] - Scoring
//! - [`ZonEncoder`], [`ZonDecoder`] - ZON text format
//!
//! ## Test/Mock Support
//! [`MockEmbedder`] is available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod config;
pub mod constants;
pub mod embedding;
pub mod keywords;
pub mod rubric;
pub mod scoring;
pub mod text;
pub mod zon;

pub use config::{Config, ConfigError, ScoringWeights};
#[cfg(any(test, feature = "mock"))]
pub use embedding::MockEmbedder;
pub use embedding::{
    Embedder, EmbeddingBackend, EmbeddingConfig, EmbeddingError, EmbeddingProvider,
    SentenceEncoder, ZeroEmbedder, cosine_similarity,
};
pub use keywords::{ExactOnly, FuzzyMatcher, IndelRatio, KeywordMatcher};
pub use rubric::{Criterion, DefaultReason, Rubric, RubricError, RubricLoader, RubricOutcome};
pub use scoring::{
    CriterionEvidence, CriterionScore, EMPTY_TRANSCRIPT, Feedback, PreparedRubric, ScoreResult,
    ScoringEngine, ScoringError,
};
pub use zon::{ZON_CONTENT_TYPE, ZonDecoder, ZonEncoder, ZonError};
