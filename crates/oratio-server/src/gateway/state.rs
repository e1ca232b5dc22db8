use std::path::PathBuf;
use std::sync::Arc;

use oratio::ScoringEngine;

#[derive(Clone)]
pub struct HandlerState {
    pub engine: Arc<ScoringEngine>,

    /// Directory that request-supplied rubric paths are resolved against.
    pub rubric_dir: PathBuf,
}

impl HandlerState {
    /// Uses the directory of the engine's default rubric as the rubric root.
    pub fn new(engine: Arc<ScoringEngine>) -> Self {
        let rubric_dir = engine
            .loader()
            .default_path()
            .parent()
            .map(PathBuf::from)
            .unwrap_or_default();
        Self { engine, rubric_dir }
    }

    pub fn with_rubric_dir(engine: Arc<ScoringEngine>, rubric_dir: impl Into<PathBuf>) -> Self {
        Self {
            engine,
            rubric_dir: rubric_dir.into(),
        }
    }
}
