//! In-process embeddings via fastembed-rs.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::embedder::Embedder;
use crate::error::TickError;

/// Supported local embedding models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocalEmbeddingModel {
    /// all-MiniLM-L6-v2 (384 dims).
    AllMiniLmL6V2,
    /// all-MiniLM-L12-v2 (384 dims).
    AllMiniLmL12V2,
    /// BGE-small-en-v1.5 (384 dims).
    BgeSmallEn,
    /// BGE-base-en-v1.5 (768 dims).
    BgeBaseEn,
}

impl LocalEmbeddingModel {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::AllMiniLmL6V2 => "all-MiniLM-L6-v2",
            Self::AllMiniLmL12V2 => "all-MiniLM-L12-v2",
            Self::BgeSmallEn => "bge-small-en-v1.5",
            Self::BgeBaseEn => "bge-base-en-v1.5",
        }
    }

    #[must_use]
    pub fn dimensions(&self) -> usize {
        match self {
            Self::AllMiniLmL6V2 | Self::AllMiniLmL12V2 | Self::BgeSmallEn => 384,
            Self::BgeBaseEn => 768,
        }
    }

    /// Resolve a configured model name. Accepts the bare name or a
    /// `sentence-transformers/` prefixed one.
    ///
    /// # Errors
    ///
    /// Returns [`TickError::ModelLoad`] for unknown names.
    pub fn from_name(name: &str) -> Result<Self, TickError> {
        let bare = name
            .trim()
            .trim_start_matches("sentence-transformers/")
            .trim_start_matches("BAAI/")
            .to_ascii_lowercase();
        match bare.as_str() {
            "all-minilm-l6-v2" => Ok(Self::AllMiniLmL6V2),
            "all-minilm-l12-v2" => Ok(Self::AllMiniLmL12V2),
            "bge-small-en" | "bge-small-en-v1.5" => Ok(Self::BgeSmallEn),
            "bge-base-en" | "bge-base-en-v1.5" => Ok(Self::BgeBaseEn),
            _ => Err(TickError::ModelLoad(format!(
                "unsupported local embedding model '{name}'"
            ))),
        }
    }
}

impl From<LocalEmbeddingModel> for fastembed::EmbeddingModel {
    fn from(model: LocalEmbeddingModel) -> Self {
        match model {
            LocalEmbeddingModel::AllMiniLmL6V2 => fastembed::EmbeddingModel::AllMiniLML6V2,
            LocalEmbeddingModel::AllMiniLmL12V2 => fastembed::EmbeddingModel::AllMiniLML12V2,
            LocalEmbeddingModel::BgeSmallEn => fastembed::EmbeddingModel::BGESmallENV15,
            LocalEmbeddingModel::BgeBaseEn => fastembed::EmbeddingModel::BGEBaseENV15,
        }
    }
}

/// Local embedding provider using fastembed-rs.
///
/// Inference needs exclusive access to the ONNX session, so calls are
/// serialized through a mutex and run on the blocking thread pool.
pub struct FastEmbedProvider {
    model: Arc<Mutex<fastembed::TextEmbedding>>,
    kind: LocalEmbeddingModel,
}

impl FastEmbedProvider {
    /// Load the model, downloading it into `cache_dir` if not cached yet.
    ///
    /// # Errors
    ///
    /// Returns [`TickError::ModelLoad`] if the model cannot be fetched or initialized.
    pub fn new(kind: LocalEmbeddingModel, cache_dir: Option<PathBuf>) -> Result<Self, TickError> {
        let cache_dir = cache_dir.unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from(".cache"))
                .join("nre")
                .join("models")
        });

        tracing::info!(
            model = kind.name(),
            dimensions = kind.dimensions(),
            cache_dir = %cache_dir.display(),
            "loading local embedding model"
        );

        let options = fastembed::InitOptions::new(kind.into())
            .with_show_download_progress(false)
            .with_cache_dir(cache_dir);

        let model = fastembed::TextEmbedding::try_new(options)
            .map_err(|e| TickError::ModelLoad(format!("failed to load {}: {e}", kind.name())))?;

        Ok(Self {
            model: Arc::new(Mutex::new(model)),
            kind,
        })
    }
}

#[async_trait]
impl Embedder for FastEmbedProvider {
    fn model_name(&self) -> &str {
        self.kind.name()
    }

    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, TickError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let owned: Vec<String> = texts.iter().map(|s| (*s).to_string()).collect();
        let expected = owned.len();
        let model = Arc::clone(&self.model);

        let vectors = tokio::task::spawn_blocking(move || {
            let mut guard = model
                .lock()
                .map_err(|_| TickError::Inference("embedding model lock poisoned".to_string()))?;
            guard
                .embed(owned, None)
                .map_err(|e| TickError::Inference(format!("embedding failed: {e}")))
        })
        .await
        .map_err(|e| TickError::Inference(format!("embedding task failed: {e}")))??;

        if vectors.len() != expected {
            return Err(TickError::Inference(format!(
                "model returned {} embeddings for {expected} inputs",
                vectors.len()
            )));
        }

        Ok(vectors)
    }
}
