//! candle BERT sentence encoder (MiniLM-style checkpoints).
//!
//! A model directory holds `config.json`, `model.safetensors` and `tokenizer.json`.
//! Sentence vectors are the attention-masked mean of the last hidden layer, L2-normalized.

use std::path::Path;

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config};
use tokenizers::Tokenizer;
use tracing::{debug, info};

use super::Embedder;
use super::device::select_device;
use super::error::EmbeddingError;
use super::utils::load_tokenizer;

pub struct SentenceEncoder {
    name: String,
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
    dim: usize,
}

impl std::fmt::Debug for SentenceEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentenceEncoder")
            .field("name", &self.name)
            .field("device", &format!("{:?}", self.device))
            .field("dim", &self.dim)
            .finish()
    }
}

impl SentenceEncoder {
    /// Loads a checkpoint from `model_dir`, reporting it under `name`.
    pub fn load(name: &str, model_dir: &Path, max_seq_len: usize) -> Result<Self, EmbeddingError> {
        if !model_dir.is_dir() {
            return Err(EmbeddingError::ModelNotFound {
                path: model_dir.to_path_buf(),
            });
        }

        let config_path = model_dir.join("config.json");
        let weights_path = model_dir.join("model.safetensors");
        for required in [&config_path, &weights_path] {
            if !required.is_file() {
                return Err(EmbeddingError::ModelNotFound {
                    path: required.clone(),
                });
            }
        }

        let device = select_device();
        debug!(?device, model = %name, "Selected compute device for sentence encoder");

        let config = read_config(&config_path)?;
        let model = load_weights(&weights_path, &config, &device)?;
        let tokenizer =
            load_tokenizer(model_dir, max_seq_len).map_err(|e| EmbeddingError::ModelLoadFailed {
                reason: format!("failed to load tokenizer: {e}"),
            })?;

        info!(
            model = %name,
            model_dir = %model_dir.display(),
            hidden_size = config.hidden_size,
            num_layers = config.num_hidden_layers,
            "Sentence encoder loaded"
        );

        Ok(Self {
            name: name.to_string(),
            model,
            tokenizer,
            device,
            dim: config.hidden_size,
        })
    }

    fn encode(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let encoding =
            self.tokenizer
                .encode(text, true)
                .map_err(|e| EmbeddingError::TokenizationFailed {
                    reason: e.to_string(),
                })?;

        if encoding.get_ids().is_empty() {
            return Ok(vec![0.0; self.dim]);
        }

        let input_ids = Tensor::new(encoding.get_ids(), &self.device)?.unsqueeze(0)?;
        let type_ids = Tensor::new(encoding.get_type_ids(), &self.device)?.unsqueeze(0)?;
        let mask = Tensor::new(encoding.get_attention_mask(), &self.device)?.unsqueeze(0)?;

        // [1, seq_len, hidden]
        let hidden = self.model.forward(&input_ids, &type_ids, Some(&mask))?;

        let mask = mask.to_dtype(DType::F32)?.unsqueeze(2)?;
        let summed = hidden.broadcast_mul(&mask)?.sum(1)?;
        let counts = mask.sum(1)?;
        let pooled = summed.broadcast_div(&counts)?.squeeze(0)?;

        Ok(normalize(pooled.to_vec1::<f32>()?))
    }
}

impl Embedder for SentenceEncoder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        debug!(text_len = text.len(), model = %self.name, "Encoding text");
        self.encode(text)
    }

    fn dim(&self) -> usize {
        self.dim
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn read_config(path: &Path) -> Result<Config, EmbeddingError> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| EmbeddingError::ModelLoadFailed {
        reason: format!("failed to parse {}: {e}", path.display()),
    })
}

fn load_weights(path: &Path, config: &Config, device: &Device) -> Result<BertModel, EmbeddingError> {
    let vb = unsafe { VarBuilder::from_mmaped_safetensors(&[path], DType::F32, device) }.map_err(
        |e| EmbeddingError::ModelLoadFailed {
            reason: format!("failed to map weights: {e}"),
        },
    )?;

    // Exports differ on whether the encoder sits under a `bert.` prefix.
    let vb = if vb.contains_tensor("bert.embeddings.word_embeddings.weight") {
        vb.pp("bert")
    } else {
        vb
    };

    BertModel::load(vb, config).map_err(|e| EmbeddingError::ModelLoadFailed {
        reason: format!("failed to build BERT model: {e}"),
    })
}

fn normalize(mut v: Vec<f32>) -> Vec<f32> {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in &mut v {
            *x /= norm;
        }
    }
    v
}
