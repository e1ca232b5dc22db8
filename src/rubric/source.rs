//! Tabular rubric sources, read into a raw grid of JSON cells.
//!
//! CSV cells are strings (empty cells become `null`). JSON sources may be an array of rows
//! (arrays) or an array of header-labeled records (objects); their cells keep their JSON type.

use std::path::Path;

use serde_json::{Map, Value};

use super::error::RubricError;

/// Rows of cells, header row(s) included.
pub type Grid = Vec<Vec<Value>>;

/// Reads `path` as JSON when it has a `.json` extension, otherwise as CSV.
pub fn read_grid(path: &Path) -> Result<Grid, RubricError> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        let content = std::fs::read_to_string(path).map_err(|source| RubricError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        grid_from_json(&content)
    } else {
        let file = std::fs::File::open(path).map_err(|source| RubricError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        grid_from_csv(file)
    }
}

/// Parses CSV without treating any row as a header; ragged rows are allowed.
pub fn grid_from_csv<R: std::io::Read>(reader: R) -> Result<Grid, RubricError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut grid = Grid::new();
    for record in reader.records() {
        let record = record?;
        grid.push(
            record
                .iter()
                .map(|cell| {
                    if cell.is_empty() {
                        Value::Null
                    } else {
                        Value::String(cell.to_string())
                    }
                })
                .collect(),
        );
    }
    Ok(grid)
}

pub fn grid_from_json(content: &str) -> Result<Grid, RubricError> {
    let value: Value = serde_json::from_str(content)?;
    let Value::Array(rows) = value else {
        return Err(RubricError::UnsupportedLayout {
            reason: "top-level value must be an array".to_string(),
        });
    };

    if rows.iter().all(Value::is_array) {
        return Ok(rows
            .into_iter()
            .map(|row| match row {
                Value::Array(cells) => cells,
                _ => Vec::new(),
            })
            .collect());
    }

    if rows.iter().all(Value::is_object) {
        return Ok(records_to_grid(rows));
    }

    Err(RubricError::UnsupportedLayout {
        reason: "rows must be all arrays or all objects".to_string(),
    })
}

fn records_to_grid(rows: Vec<Value>) -> Grid {
    let mut header: Vec<String> = Vec::new();
    for row in &rows {
        if let Value::Object(map) = row {
            for key in map.keys() {
                if !header.contains(key) {
                    header.push(key.clone());
                }
            }
        }
    }

    let mut grid = Grid::with_capacity(rows.len() + 1);
    grid.push(header.iter().cloned().map(Value::String).collect());

    let empty = Map::new();
    for row in &rows {
        let map = row.as_object().unwrap_or(&empty);
        grid.push(
            header
                .iter()
                .map(|key| map.get(key).cloned().unwrap_or(Value::Null))
                .collect(),
        );
    }
    grid
}
