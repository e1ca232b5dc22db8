use std::path::{Path, PathBuf};

use crate::constants::{
    DEFAULT_EMBEDDING_DIM, DEFAULT_EMBEDDING_MODEL, DEFAULT_MAX_SEQ_LEN, DEFAULT_MODEL_DIR,
    PREFERRED_EMBEDDING_MODELS,
};

/// Which real embedding backend is available to this process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingBackend {
    /// candle BERT sentence encoder.
    Candle,
    /// No real backend; only the zero-vector fallback can serve.
    Unavailable,
}

impl EmbeddingBackend {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "none" | "off" | "disabled" | "unavailable" => EmbeddingBackend::Unavailable,
            _ => EmbeddingBackend::Candle,
        }
    }
}

/// Model selection and fallback policy for [`EmbeddingProvider`](super::EmbeddingProvider).
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    /// Explicit model override (`EMBEDDING_MODEL`).
    pub model_name: Option<String>,
    /// Used when no override is given.
    pub default_model: String,
    /// Tried in order after the desired model.
    pub preferred_models: Vec<String>,
    /// Root directory that model identifiers are resolved against.
    pub model_dir: PathBuf,
    /// Serve zero vectors when no model loads.
    pub allow_fallback: bool,
    pub backend: EmbeddingBackend,
    pub embedding_dim: usize,
    pub max_seq_len: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model_name: None,
            default_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            preferred_models: PREFERRED_EMBEDDING_MODELS
                .iter()
                .map(|m| m.to_string())
                .collect(),
            model_dir: PathBuf::from(DEFAULT_MODEL_DIR),
            allow_fallback: true,
            backend: EmbeddingBackend::Candle,
            embedding_dim: DEFAULT_EMBEDDING_DIM,
            max_seq_len: DEFAULT_MAX_SEQ_LEN,
        }
    }
}

impl EmbeddingConfig {
    pub const ENV_MODEL: &'static str = "EMBEDDING_MODEL";
    pub const ENV_ALLOW_FALLBACK: &'static str = "EMBEDDING_ALLOW_FALLBACK";
    pub const ENV_MODEL_DIR: &'static str = "EMBEDDING_MODEL_DIR";
    pub const ENV_BACKEND: &'static str = "EMBEDDING_BACKEND";

    /// Reads the `EMBEDDING_*` variables on top of defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let model_name = std::env::var(Self::ENV_MODEL)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let allow_fallback = std::env::var(Self::ENV_ALLOW_FALLBACK)
            .map(|v| parse_flag(&v))
            .unwrap_or(defaults.allow_fallback);

        let model_dir = std::env::var(Self::ENV_MODEL_DIR)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.model_dir);

        let backend = std::env::var(Self::ENV_BACKEND)
            .map(|v| EmbeddingBackend::parse(&v))
            .unwrap_or(defaults.backend);

        Self {
            model_name,
            allow_fallback,
            model_dir,
            backend,
            ..Self::default()
        }
    }

    /// Config that never touches model files and always serves zero vectors.
    pub fn stub() -> Self {
        Self {
            backend: EmbeddingBackend::Unavailable,
            allow_fallback: true,
            ..Self::default()
        }
    }

    pub fn with_model_dir<P: Into<PathBuf>>(mut self, model_dir: P) -> Self {
        self.model_dir = model_dir.into();
        self
    }

    pub fn with_allow_fallback(mut self, allow_fallback: bool) -> Self {
        self.allow_fallback = allow_fallback;
        self
    }

    /// Candidate model identifiers in load order: explicit, override, default, then preferred.
    pub fn candidates(&self, explicit: Option<&str>) -> Vec<String> {
        let desired = explicit
            .map(str::to_string)
            .or_else(|| self.model_name.clone())
            .unwrap_or_else(|| self.default_model.clone());

        let mut out = vec![desired];
        for model in &self.preferred_models {
            if !out.contains(model) {
                out.push(model.clone());
            }
        }
        out
    }

    /// An existing directory is used as-is; anything else is looked up under `model_dir`.
    pub fn resolve_model_dir(&self, name: &str) -> PathBuf {
        let direct = Path::new(name);
        if direct.is_dir() {
            return direct.to_path_buf();
        }
        self.model_dir.join(name)
    }
}

/// `1`, `true` and `yes` (any case) are truthy; everything else is false.
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}
