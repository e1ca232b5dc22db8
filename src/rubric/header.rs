//! Header normalization and header-row detection.

use serde_json::Value;

pub const CRITERION_NAME: &str = "Criterion Name";
pub const DESCRIPTION: &str = "Description";
pub const KEYWORDS: &str = "Keywords";
pub const WEIGHT: &str = "Weight";
pub const MIN_WORDS: &str = "Min Words";
pub const MAX_WORDS: &str = "Max Words";

pub const REQUIRED_COLUMNS: [&str; 4] = [CRITERION_NAME, DESCRIPTION, KEYWORDS, WEIGHT];

/// Substrings that identify each required column during header detection.
const REQUIRED_CONCEPTS: [&str; 4] = ["criterion", "keyword", "description", "weight"];

const MISSING_MARKERS: [&str; 6] = ["", "nan", "na", "n/a", "null", "none"];

/// Lowercased text with all whitespace removed.
fn squash(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Maps a header cell onto a canonical column name; unknown headers keep their trimmed text.
pub fn normalize_column(cell: &Value) -> String {
    let raw = cell_text(cell).unwrap_or_default();
    let key = squash(&raw);

    if key.contains("criterion") {
        CRITERION_NAME.to_string()
    } else if key.contains("description") {
        DESCRIPTION.to_string()
    } else if key.contains("keyword") {
        KEYWORDS.to_string()
    } else if key.contains("weight") {
        WEIGHT.to_string()
    } else if key.contains("min") && key.contains("word") {
        MIN_WORDS.to_string()
    } else if key.contains("max") && key.contains("word") {
        MAX_WORDS.to_string()
    } else {
        raw.trim().to_string()
    }
}

/// Number of distinct required concepts mentioned across a row's cells.
pub fn concept_count(row: &[Value]) -> usize {
    let cells: Vec<String> = row
        .iter()
        .filter_map(cell_text)
        .map(|text| squash(&text))
        .collect();

    REQUIRED_CONCEPTS
        .iter()
        .filter(|concept| cells.iter().any(|cell| cell.contains(*concept)))
        .count()
}

/// Index of the first of `scan_rows` rows that names at least `min_concepts` concepts.
pub fn find_header_row(grid: &[Vec<Value>], scan_rows: usize, min_concepts: usize) -> Option<usize> {
    grid.iter()
        .take(scan_rows)
        .position(|row| concept_count(row) >= min_concepts)
}

/// `true` for `null` and for text cells that spell a missing value (`NaN`, `N/A`, ...).
pub fn is_missing(cell: &Value) -> bool {
    match cell {
        Value::Null => true,
        Value::String(s) => MISSING_MARKERS.contains(&s.trim().to_ascii_lowercase().as_str()),
        _ => false,
    }
}

/// Scalar cell rendered as text; `None` for missing cells and containers.
pub fn cell_text(cell: &Value) -> Option<String> {
    if is_missing(cell) {
        return None;
    }
    match cell {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
