use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Marker set on [`ScoreResult::error`] when the transcript is blank.
pub const EMPTY_TRANSCRIPT: &str = "empty transcript";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Per-criterion scores for one transcript.
pub struct CriterionScore {
    pub name: String,
    pub weight: f64,
    /// Share of the criterion's keywords found, 0-100.
    pub keyword_score: f64,
    /// Matched keywords in rubric order and casing.
    pub keywords_found: Vec<String>,
    /// Transcript/description similarity scaled to 0-100.
    pub semantic_score: f64,
    /// `0.0` or one of the two configured length penalties.
    pub length_penalty: f64,
    /// Combined score clamped to 0-100.
    pub raw_score: f64,
    /// Unclamped combined score scaled by the criterion's weight share.
    pub weighted_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Detail behind a criterion's score, keyed by criterion name in [`ScoreResult::evidence`].
pub struct CriterionEvidence {
    pub name: String,
    pub description: String,
    pub weight: f64,
    pub keyword_score: f64,
    pub keywords_found: Vec<String>,
    pub semantic_score: f64,
    pub length_penalty: f64,
    pub raw_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Deterministic coaching text for one criterion.
pub struct Feedback {
    pub evaluation: String,
    pub suggestion: String,
    pub justification: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Scores for one transcript against one rubric.
pub struct ScoreResult {
    /// Sum of weighted scores clamped to 0-100.
    pub overall_score: f64,
    pub word_count: usize,
    pub criteria: Vec<CriterionScore>,
    /// Later criteria overwrite earlier ones with the same name.
    pub evidence: BTreeMap<String, CriterionEvidence>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<BTreeMap<String, Feedback>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScoreResult {
    /// Zero-score result returned for blank input without invoking the engine.
    pub fn empty_transcript() -> Self {
        Self {
            overall_score: 0.0,
            word_count: 0,
            criteria: Vec::new(),
            evidence: BTreeMap::new(),
            feedback: None,
            error: Some(EMPTY_TRANSCRIPT.to_string()),
        }
    }

    /// Attaches [`feedback::generate`](super::feedback::generate) output for every criterion.
    pub fn with_feedback(mut self) -> Self {
        self.feedback = Some(super::feedback::generate(self.evidence.values()));
        self
    }

    pub fn criterion(&self, name: &str) -> Option<&CriterionScore> {
        self.criteria.iter().find(|c| c.name == name)
    }
}
