//! Rule-based feedback derived from criterion evidence.

use std::collections::BTreeMap;

use super::types::{CriterionEvidence, Feedback};

/// Semantic score at or above which found keywords count as good coverage.
const GOOD_SEMANTIC_SCORE: f64 = 60.0;

/// Maps each criterion name to its feedback; duplicate names keep the last entry.
pub fn generate<'a, I>(evidence: I) -> BTreeMap<String, Feedback>
where
    I: IntoIterator<Item = &'a CriterionEvidence>,
{
    evidence
        .into_iter()
        .map(|e| (e.name.clone(), feedback_for(e)))
        .collect()
}

pub fn feedback_for(evidence: &CriterionEvidence) -> Feedback {
    let has_keywords = !evidence.keywords_found.is_empty();
    let semantic = evidence.semantic_score;

    let (evaluation, suggestion) = if !has_keywords && semantic < GOOD_SEMANTIC_SCORE {
        (
            "Low relevance to this criterion.",
            "Mention the topic explicitly and give a short example.",
        )
    } else if has_keywords && semantic >= GOOD_SEMANTIC_SCORE {
        (
            "Good coverage of this criterion.",
            "Add a specific example to strengthen it.",
        )
    } else {
        (
            "Partial coverage.",
            "Expand the relevant points and include keywords.",
        )
    };

    Feedback {
        evaluation: evaluation.to_string(),
        suggestion: suggestion.to_string(),
        justification: format!(
            "Keywords found: {}. Semantic score: {:.2}. Computed raw score: {:.1}.",
            keyword_list(&evidence.keywords_found),
            semantic,
            evidence.raw_score
        ),
    }
}

/// `['a', 'b']`, or `[]` when nothing was found.
fn keyword_list(keywords: &[String]) -> String {
    let quoted: Vec<String> = keywords.iter().map(|k| format!("'{k}'")).collect();
    format!("[{}]", quoted.join(", "))
}
