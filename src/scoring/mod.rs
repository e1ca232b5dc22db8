//! Transcript scoring against a rubric.
//!
//! For every criterion the [`ScoringEngine`] combines three signals:
//!
//! - keyword coverage from [`KeywordMatcher`](crate::keywords::KeywordMatcher),
//! - semantic similarity between the transcript and the criterion description,
//! - a length penalty when the word count falls outside the criterion's bounds.
//!
//! `raw = keyword_weight * keyword + semantic_weight * semantic + penalty`. The reported
//! `raw_score` is clamped to 0-100, but `weighted_score` scales the *unclamped* value, so a
//! heavily penalized criterion still pulls the overall score down while displaying `0.0`.
//! The overall score is the clamped sum of weighted scores.

pub mod engine;
pub mod error;
pub mod feedback;
pub mod types;


pub use engine::{PreparedRubric, ScoringEngine};
pub use error::ScoringError;
pub use types::{CriterionEvidence, CriterionScore, EMPTY_TRANSCRIPT, Feedback, ScoreResult};
