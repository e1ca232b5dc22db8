use std::fmt;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info, warn};

use super::header::{
    CRITERION_NAME, DESCRIPTION, KEYWORDS, MAX_WORDS, MIN_WORDS, REQUIRED_COLUMNS, WEIGHT,
    cell_text, find_header_row, is_missing, normalize_column,
};
use super::source::read_grid;
use super::{Criterion, Rubric};
use crate::constants::{DEFAULT_RUBRIC_PATH, HEADER_MIN_CONCEPTS, HEADER_SCAN_ROWS};

static NULL_CELL: Value = Value::Null;

/// Why the built-in rubric was used instead of the requested source.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultReason {
    FileMissing { path: PathBuf },
    Unreadable { reason: String },
    /// A header row was found but lacks required columns.
    MissingColumns { missing: Vec<String> },
    /// No row within the scan window looks like a header.
    HeaderNotFound,
    MalformedCell {
        row: usize,
        column: String,
        value: String,
    },
}

impl fmt::Display for DefaultReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultReason::FileMissing { path } => {
                write!(f, "rubric file not found: {}", path.display())
            }
            DefaultReason::Unreadable { reason } => write!(f, "rubric unreadable: {reason}"),
            DefaultReason::MissingColumns { missing } => {
                write!(f, "rubric missing columns: {}", missing.join(", "))
            }
            DefaultReason::HeaderNotFound => write!(f, "no rubric header row found"),
            DefaultReason::MalformedCell { row, column, value } => {
                write!(f, "malformed '{column}' cell in row {row}: {value}")
            }
        }
    }
}

/// Result of a tolerant load: either the parsed rubric or the reason to use the default.
#[derive(Debug, Clone, PartialEq)]
pub enum RubricOutcome {
    Loaded(Rubric),
    UseDefault(DefaultReason),
}

impl RubricOutcome {
    pub fn is_default(&self) -> bool {
        matches!(self, RubricOutcome::UseDefault(_))
    }

    /// The loaded rubric, or the built-in default.
    pub fn into_rubric(self) -> Rubric {
        match self {
            RubricOutcome::Loaded(rubric) => rubric,
            RubricOutcome::UseDefault(_) => Rubric::default_rubric(),
        }
    }
}

/// Loads rubrics from disk, falling back to [`Rubric::default_rubric`].
#[derive(Debug, Clone)]
pub struct RubricLoader {
    default_path: PathBuf,
}

impl Default for RubricLoader {
    fn default() -> Self {
        Self::new(DEFAULT_RUBRIC_PATH)
    }
}

impl RubricLoader {
    pub fn new<P: Into<PathBuf>>(default_path: P) -> Self {
        Self {
            default_path: default_path.into(),
        }
    }

    pub fn default_path(&self) -> &Path {
        &self.default_path
    }

    /// The explicit path if given, else the configured default.
    pub fn resolve(&self, path: Option<&Path>) -> PathBuf {
        path.map(Path::to_path_buf)
            .unwrap_or_else(|| self.default_path.clone())
    }

    /// Never fails; see the module docs for when the default rubric is returned.
    pub fn load(&self, path: Option<&Path>) -> Rubric {
        let resolved = self.resolve(path);
        match self.try_load(Some(&resolved)) {
            RubricOutcome::Loaded(rubric) => {
                info!(path = %resolved.display(), criteria = rubric.len(), "Rubric loaded");
                rubric
            }
            RubricOutcome::UseDefault(DefaultReason::FileMissing { path }) => {
                debug!(path = %path.display(), "No rubric file, using default rubric");
                Rubric::default_rubric()
            }
            RubricOutcome::UseDefault(reason) => {
                warn!(path = %resolved.display(), reason = %reason, "Using default rubric");
                Rubric::default_rubric()
            }
        }
    }

    pub fn try_load(&self, path: Option<&Path>) -> RubricOutcome {
        let resolved = self.resolve(path);
        if !resolved.is_file() {
            return RubricOutcome::UseDefault(DefaultReason::FileMissing { path: resolved });
        }

        let grid = match read_grid(&resolved) {
            Ok(grid) => grid,
            Err(e) => {
                return RubricOutcome::UseDefault(DefaultReason::Unreadable {
                    reason: e.to_string(),
                });
            }
        };

        match parse_grid(&grid) {
            Ok(rubric) => RubricOutcome::Loaded(rubric),
            Err(reason) => RubricOutcome::UseDefault(reason),
        }
    }
}

/// Parses a raw grid: first with row 0 as header, then with a detected header row.
pub fn parse_grid(grid: &[Vec<Value>]) -> Result<Rubric, DefaultReason> {
    match parse_with_header(grid, 0) {
        Err(DefaultReason::MissingColumns { missing }) => {
            debug!(missing = ?missing, "First row is not a rubric header, scanning");
            let header_row = find_header_row(grid, HEADER_SCAN_ROWS, HEADER_MIN_CONCEPTS)
                .ok_or(DefaultReason::HeaderNotFound)?;
            debug!(header_row, "Re-parsing rubric with detected header");
            parse_with_header(grid, header_row)
        }
        other => other,
    }
}

struct Columns {
    name: usize,
    description: usize,
    keywords: usize,
    weight: usize,
    min_words: Option<usize>,
    max_words: Option<usize>,
}

impl Columns {
    fn from_header(header: &[Value]) -> Result<Self, DefaultReason> {
        let names: Vec<String> = header.iter().map(normalize_column).collect();
        let find = |target: &str| names.iter().position(|n| n == target);

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|&&col| find(col).is_none())
            .map(|col| col.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(DefaultReason::MissingColumns { missing });
        }

        let required = |target: &str| {
            find(target).ok_or_else(|| DefaultReason::MissingColumns {
                missing: vec![target.to_string()],
            })
        };

        Ok(Self {
            name: required(CRITERION_NAME)?,
            description: required(DESCRIPTION)?,
            keywords: required(KEYWORDS)?,
            weight: required(WEIGHT)?,
            min_words: find(MIN_WORDS),
            max_words: find(MAX_WORDS),
        })
    }
}

fn parse_with_header(grid: &[Vec<Value>], header_row: usize) -> Result<Rubric, DefaultReason> {
    let header = grid
        .get(header_row)
        .ok_or_else(|| DefaultReason::MissingColumns {
            missing: REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect(),
        })?;
    let columns = Columns::from_header(header)?;

    let mut criteria = Vec::new();
    for (offset, row) in grid.iter().enumerate().skip(header_row + 1) {
        if row.iter().all(is_missing) {
            continue;
        }
        criteria.push(parse_row(row, &columns, offset)?);
    }

    Ok(Rubric::new(criteria))
}

fn parse_row(row: &[Value], columns: &Columns, row_index: usize) -> Result<Criterion, DefaultReason> {
    let cell = |idx: usize| row.get(idx).unwrap_or(&NULL_CELL);
    let text = |idx: usize| cell_text(cell(idx)).unwrap_or_default();

    let min_words = match columns.min_words {
        Some(idx) => parse_word_bound(cell(idx), MIN_WORDS, row_index)?,
        None => None,
    };
    let max_words = match columns.max_words {
        Some(idx) => parse_word_bound(cell(idx), MAX_WORDS, row_index)?,
        None => None,
    };

    Ok(Criterion {
        name: text(columns.name),
        description: text(columns.description),
        keywords: parse_keywords(cell(columns.keywords)),
        weight: parse_weight(cell(columns.weight)),
        min_words,
        max_words,
    })
}

/// Comma-split text cells; arrays are taken element-wise; anything else has no keywords.
fn parse_keywords(cell: &Value) -> Vec<String> {
    match cell {
        Value::String(s) if !is_missing(cell) => s
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .collect(),
        Value::Array(items) => items.iter().filter_map(cell_text).collect(),
        _ => Vec::new(),
    }
}

/// Missing or unparseable weights count as `0.0`.
fn parse_weight(cell: &Value) -> f64 {
    let weight = match cell {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };
    weight.filter(|w| w.is_finite()).unwrap_or(0.0)
}

fn parse_word_bound(
    cell: &Value,
    column: &str,
    row_index: usize,
) -> Result<Option<usize>, DefaultReason> {
    if is_missing(cell) {
        return Ok(None);
    }

    let number = match cell {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match number {
        Some(n) if n.is_finite() && n >= 0.0 => Ok(Some(n.trunc() as usize)),
        _ => Err(DefaultReason::MalformedCell {
            row: row_index,
            column: column.to_string(),
            value: cell.to_string(),
        }),
    }
}
