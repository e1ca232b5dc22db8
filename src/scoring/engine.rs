use std::path::{Path, PathBuf};
use std::sync::Arc;

use moka::sync::Cache;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::config::{Config, ConfigError, ScoringWeights};
use crate::constants::{FALLBACK_TOTAL_WEIGHT, SCORE_MAX, SCORE_MIN};
use crate::embedding::{EmbeddingError, EmbeddingProvider, cosine_similarity};
use crate::keywords::{IndelRatio, KeywordMatcher};
use crate::rubric::{Criterion, DefaultReason, Rubric, RubricLoader, RubricOutcome};
use crate::text;

use super::error::ScoringError;
use super::types::{CriterionEvidence, CriterionScore, ScoreResult};

/// A rubric together with one embedding per criterion description.
#[derive(Debug, Clone)]
pub struct PreparedRubric {
    rubric: Rubric,
    embeddings: Vec<Vec<f32>>,
}

impl PreparedRubric {
    pub fn rubric(&self) -> &Rubric {
        &self.rubric
    }

    pub fn embeddings(&self) -> &[Vec<f32>] {
        &self.embeddings
    }
}

/// Scores transcripts against rubrics.
///
/// Owns the embedding provider and the prepared rubrics. The configured default rubric
/// and the built-in fallback rubric each live in their own slot for the engine's lifetime.
/// Other rubric files go into a bounded cache keyed by canonical path, so differently
/// spelled paths share an entry. Every path that falls back to the built-in rubric
/// shares one prepared copy, so missing paths neither re-embed it nor take cache space.
/// The first caller for a rubric loads and embeds it while concurrent callers wait for
/// that result; entries are never rewritten until invalidated.
pub struct ScoringEngine {
    provider: Arc<EmbeddingProvider>,
    matcher: KeywordMatcher,
    weights: ScoringWeights,
    loader: RubricLoader,
    default_slot: Mutex<Option<Arc<PreparedRubric>>>,
    builtin_slot: Mutex<Option<Arc<PreparedRubric>>>,
    prepared: Cache<PathBuf, Arc<PreparedRubric>>,
}

impl std::fmt::Debug for ScoringEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoringEngine")
            .field("provider", &self.provider)
            .field("matcher", &self.matcher)
            .field("weights", &self.weights)
            .field("loader", &self.loader)
            .field("cached_rubrics", &self.prepared.entry_count())
            .finish()
    }
}

/// Where the prepared rubric for a resolved path is kept.
enum Slot {
    Default,
    Builtin,
    File(PathBuf),
}

/// Canonical form of an existing path, else its absolute lexical form.
fn rubric_key(path: &Path) -> PathBuf {
    path.canonicalize()
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

impl ScoringEngine {
    const MAX_PREPARED_RUBRICS: u64 = 64;

    /// `weights` are used as given; [`from_config`](Self::from_config) validates them.
    pub fn new(
        provider: Arc<EmbeddingProvider>,
        matcher: KeywordMatcher,
        weights: ScoringWeights,
        loader: RubricLoader,
    ) -> Self {
        Self {
            provider,
            matcher,
            weights,
            loader,
            default_slot: Mutex::new(None),
            builtin_slot: Mutex::new(None),
            prepared: Cache::builder()
                .max_capacity(Self::MAX_PREPARED_RUBRICS)
                .build(),
        }
    }

    /// Validates `config` first, so out-of-range weights never reach a score.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(
            Arc::new(EmbeddingProvider::new(config.embedding.clone())),
            KeywordMatcher::new(Arc::new(IndelRatio), config.fuzzy_threshold),
            config.weights,
            RubricLoader::new(config.rubric_path.clone()),
        ))
    }

    /// Zero-vector embeddings, default weights and the default rubric path.
    pub fn stub() -> Self {
        Self::new(
            Arc::new(EmbeddingProvider::stub()),
            KeywordMatcher::default(),
            ScoringWeights::default(),
            RubricLoader::default(),
        )
    }

    pub fn provider(&self) -> &EmbeddingProvider {
        &self.provider
    }

    pub fn matcher(&self) -> &KeywordMatcher {
        &self.matcher
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn loader(&self) -> &RubricLoader {
        &self.loader
    }

    fn slot_for(&self, path: Option<&Path>) -> Slot {
        let key = rubric_key(&self.loader.resolve(path));
        if key == rubric_key(self.loader.default_path()) {
            Slot::Default
        } else if self.prepared.contains_key(&key) || key.is_file() {
            Slot::File(key)
        } else {
            Slot::Builtin
        }
    }

    /// `true` if the rubric at `path` (or the default path) is already prepared.
    pub fn is_prepared(&self, path: Option<&Path>) -> bool {
        match self.slot_for(path) {
            Slot::Default => self.default_slot.lock().is_some(),
            Slot::Builtin => self.builtin_slot.lock().is_some(),
            Slot::File(key) => self.prepared.contains_key(&key),
        }
    }

    /// Drops the prepared rubric for `path` so the next call reloads it from disk.
    pub fn invalidate(&self, path: Option<&Path>) {
        match self.slot_for(path) {
            Slot::Default => *self.default_slot.lock() = None,
            Slot::Builtin => {}
            Slot::File(key) => self.prepared.invalidate(&key),
        }
    }

    /// Loads and embeds the rubric for `path` once; later calls return the prepared entry.
    pub fn prepare(&self, path: Option<&Path>) -> Result<Arc<PreparedRubric>, ScoringError> {
        let result = match self.slot_for(path) {
            Slot::Default => self.prepare_default().map_err(Arc::new),
            Slot::Builtin => self.prepare_builtin().map_err(Arc::new),
            Slot::File(key) => self
                .prepared
                .try_get_with(key.clone(), || self.load_and_embed(&key)),
        };
        result.map_err(|source| ScoringError::Prepare {
            path: self.loader.resolve(path),
            source,
        })
    }

    fn prepare_default(&self) -> Result<Arc<PreparedRubric>, EmbeddingError> {
        let mut slot = self.default_slot.lock();
        if let Some(prepared) = slot.as_ref() {
            return Ok(Arc::clone(prepared));
        }
        let prepared = self.load_and_embed(self.loader.default_path())?;
        *slot = Some(Arc::clone(&prepared));
        Ok(prepared)
    }

    fn prepare_builtin(&self) -> Result<Arc<PreparedRubric>, EmbeddingError> {
        let mut slot = self.builtin_slot.lock();
        if let Some(prepared) = slot.as_ref() {
            return Ok(Arc::clone(prepared));
        }
        let prepared = self.embed_rubric(Rubric::default_rubric())?;
        info!(criteria = prepared.rubric.len(), "Built-in rubric prepared");
        *slot = Some(Arc::clone(&prepared));
        Ok(prepared)
    }

    /// Embeds the rubric at `path`, or shares the built-in one when the file can't be used.
    fn load_and_embed(&self, path: &Path) -> Result<Arc<PreparedRubric>, EmbeddingError> {
        match self.loader.try_load(Some(path)) {
            RubricOutcome::Loaded(rubric) => {
                let prepared = self.embed_rubric(rubric)?;
                info!(
                    path = %path.display(),
                    criteria = prepared.rubric.len(),
                    "Rubric prepared"
                );
                Ok(prepared)
            }
            RubricOutcome::UseDefault(DefaultReason::FileMissing { path }) => {
                debug!(path = %path.display(), "No rubric file, using default rubric");
                self.prepare_builtin()
            }
            RubricOutcome::UseDefault(reason) => {
                warn!(path = %path.display(), reason = %reason, "Using default rubric");
                self.prepare_builtin()
            }
        }
    }

    fn embed_rubric(&self, rubric: Rubric) -> Result<Arc<PreparedRubric>, EmbeddingError> {
        let embeddings = self.embed_descriptions(&rubric)?;
        Ok(Arc::new(PreparedRubric { rubric, embeddings }))
    }

    /// Scores `text` against the cached rubric for `path` (or the default path).
    pub fn score(
        &self,
        text: &str,
        path: Option<&Path>,
        use_fuzzy: bool,
    ) -> Result<ScoreResult, ScoringError> {
        let prepared = self.prepare(path)?;
        self.score_prepared(text, &prepared, use_fuzzy)
    }

    /// Scores `text` against a caller-supplied rubric; its embeddings are not cached.
    pub fn score_with_rubric(
        &self,
        text: &str,
        rubric: &Rubric,
        use_fuzzy: bool,
    ) -> Result<ScoreResult, ScoringError> {
        let prepared = PreparedRubric {
            rubric: rubric.clone(),
            embeddings: self.embed_descriptions(rubric)?,
        };
        self.score_prepared(text, &prepared, use_fuzzy)
    }

    pub fn score_prepared(
        &self,
        text: &str,
        prepared: &PreparedRubric,
        use_fuzzy: bool,
    ) -> Result<ScoreResult, ScoringError> {
        let rubric = &prepared.rubric;
        if prepared.embeddings.len() != rubric.len() {
            return Err(ScoringError::EmbeddingCountMismatch {
                expected: rubric.len(),
                actual: prepared.embeddings.len(),
            });
        }

        let cleaned = text::clean(text);
        let word_count = text::count_words(&cleaned);
        let transcript = self.provider.embed(&cleaned)?;

        let total_weight = match rubric.total_weight() {
            w if w == 0.0 => FALLBACK_TOTAL_WEIGHT,
            w => w,
        };

        let mut result = ScoreResult {
            overall_score: 0.0,
            word_count,
            criteria: Vec::with_capacity(rubric.len()),
            evidence: Default::default(),
            feedback: None,
            error: None,
        };

        let mut overall = 0.0;
        for (criterion, embedding) in rubric.iter().zip(&prepared.embeddings) {
            let (keyword_score, keywords_found) =
                self.matcher
                    .keyword_score(&cleaned, &criterion.keywords, use_fuzzy);
            let semantic_score =
                (cosine_similarity(&transcript, embedding) * 100.0).clamp(SCORE_MIN, SCORE_MAX);
            let length_penalty = self.length_penalty(word_count, criterion);

            let raw = self.weights.keyword * keyword_score
                + self.weights.semantic * semantic_score
                + length_penalty;
            let raw_score = raw.clamp(SCORE_MIN, SCORE_MAX);
            let weighted_score = raw * (criterion.weight / total_weight);
            overall += weighted_score;

            result.evidence.insert(
                criterion.name.clone(),
                CriterionEvidence {
                    name: criterion.name.clone(),
                    description: criterion.description.clone(),
                    weight: criterion.weight,
                    keyword_score,
                    keywords_found: keywords_found.clone(),
                    semantic_score,
                    length_penalty,
                    raw_score,
                },
            );
            result.criteria.push(CriterionScore {
                name: criterion.name.clone(),
                weight: criterion.weight,
                keyword_score,
                keywords_found,
                semantic_score,
                length_penalty,
                raw_score,
                weighted_score,
            });
        }

        result.overall_score = overall.clamp(SCORE_MIN, SCORE_MAX);
        debug!(
            word_count,
            criteria = result.criteria.len(),
            overall = result.overall_score,
            "Transcript scored"
        );
        Ok(result)
    }

    /// Under-min takes precedence over over-max; a bound of zero never penalizes.
    pub fn length_penalty(&self, word_count: usize, criterion: &Criterion) -> f64 {
        if criterion
            .min_words
            .is_some_and(|min| min > 0 && word_count < min)
        {
            return self.weights.penalty_under_min;
        }
        if criterion
            .max_words
            .is_some_and(|max| max > 0 && word_count > max)
        {
            return self.weights.penalty_over_max;
        }
        0.0
    }

    fn embed_descriptions(&self, rubric: &Rubric) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let descriptions = rubric.descriptions();
        self.provider.embed_batch(&descriptions)
    }
}
