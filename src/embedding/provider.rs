use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use super::Embedder;
use super::config::{EmbeddingBackend, EmbeddingConfig};
use super::encoder::SentenceEncoder;
use super::error::EmbeddingError;
use super::fallback::ZeroEmbedder;

/// Lazily loads one embedding model and shares it for the provider's lifetime.
///
/// The first successful [`load_model`](Self::load_model) wins; concurrent first callers
/// serialize on the slot lock so a model is never loaded twice. Failed loads are not
/// cached, so a later call retries.
pub struct EmbeddingProvider {
    config: EmbeddingConfig,
    slot: Mutex<Option<Arc<dyn Embedder>>>,
}

impl std::fmt::Debug for EmbeddingProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let loaded = self.slot.lock().as_ref().map(|m| m.name().to_string());
        f.debug_struct("EmbeddingProvider")
            .field("config", &self.config)
            .field("loaded", &loaded)
            .finish()
    }
}

impl EmbeddingProvider {
    pub fn new(config: EmbeddingConfig) -> Self {
        Self {
            config,
            slot: Mutex::new(None),
        }
    }

    pub fn from_env() -> Self {
        Self::new(EmbeddingConfig::from_env())
    }

    /// Provider that always serves zero vectors.
    pub fn stub() -> Self {
        Self::new(EmbeddingConfig::stub())
    }

    /// Provider pre-populated with `embedder`; no model resolution happens.
    pub fn with_embedder(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            config: EmbeddingConfig::default(),
            slot: Mutex::new(Some(embedder)),
        }
    }

    pub fn config(&self) -> &EmbeddingConfig {
        &self.config
    }

    pub fn is_loaded(&self) -> bool {
        self.slot.lock().is_some()
    }

    /// Name of the loaded model, if any.
    pub fn model_name(&self) -> Option<String> {
        self.slot.lock().as_ref().map(|m| m.name().to_string())
    }

    /// `true` once the zero-vector fallback has been selected.
    pub fn is_fallback(&self) -> bool {
        self.slot.lock().as_ref().is_some_and(|m| m.is_fallback())
    }

    /// Returns the shared model, loading it on first use.
    ///
    /// Resolution order: `name`, the configured override, the default model, then the
    /// preferred list. When nothing loads, the zero-vector fallback is returned if allowed,
    /// otherwise [`EmbeddingError::InitializationFailed`].
    pub fn load_model(&self, name: Option<&str>) -> Result<Arc<dyn Embedder>, EmbeddingError> {
        let mut slot = self.slot.lock();
        if let Some(model) = slot.as_ref() {
            return Ok(Arc::clone(model));
        }

        let model = self.resolve(name)?;
        *slot = Some(Arc::clone(&model));
        Ok(model)
    }

    fn resolve(&self, name: Option<&str>) -> Result<Arc<dyn Embedder>, EmbeddingError> {
        if self.config.backend == EmbeddingBackend::Unavailable {
            return self.fallback("no embedding backend available");
        }

        let mut last_error: Option<EmbeddingError> = None;
        for candidate in self.config.candidates(name) {
            let dir = self.config.resolve_model_dir(&candidate);
            info!(model = %candidate, dir = %dir.display(), "Attempting to load embedding model");

            match SentenceEncoder::load(&candidate, &dir, self.config.max_seq_len) {
                Ok(encoder) => {
                    info!(model = %candidate, dim = encoder.dim(), "Embedding model ready");
                    return Ok(Arc::new(encoder));
                }
                Err(e) => {
                    warn!(model = %candidate, error = %e, "Failed to load embedding model");
                    last_error = Some(e);
                }
            }
        }

        let reason = match last_error {
            Some(e) => format!("failed to load any embedding model (last error: {e})"),
            None => "no embedding model candidates configured".to_string(),
        };
        self.fallback(&reason)
    }

    fn fallback(&self, reason: &str) -> Result<Arc<dyn Embedder>, EmbeddingError> {
        if !self.config.allow_fallback {
            return Err(EmbeddingError::InitializationFailed {
                reason: format!(
                    "{reason} and fallback disabled ({}=0)",
                    EmbeddingConfig::ENV_ALLOW_FALLBACK
                ),
            });
        }

        warn!(
            reason = %reason,
            dim = self.config.embedding_dim,
            "Falling back to zero-vector embedding model"
        );
        Ok(Arc::new(ZeroEmbedder::new(self.config.embedding_dim)))
    }

    /// Embeds one text as a 1-D vector.
    pub fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.load_model(None)?.embed(text)
    }

    /// Embeds each text; the output has one vector per input.
    pub fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        debug!(batch = texts.len(), "Embedding batch");
        self.load_model(None)?.embed_batch(texts)
    }
}
