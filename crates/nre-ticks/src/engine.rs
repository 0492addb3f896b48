//! Startup wiring and the two request-time scoring entry points.

use std::sync::Arc;

use nre_core::{AppConfig, EmbeddingBackend, TickDataset};

use crate::cache::TickEmbeddings;
use crate::embedder::Embedder;
use crate::error::TickError;
use crate::scorer::{max_similarity_scores, mean_similarity_scores, rank_top_k};
use crate::tei::TeiClient;
use crate::types::{ScoreMap, TextAnalysis};

/// Default and largest number of ticks returned by [`ScoringEngine::analyze_text`].
pub const DEFAULT_TOP_K: usize = nre_core::MAX_TOP_K;

/// Embedder plus the immutable tick cache built from it.
///
/// Construct once at process start and share behind an `Arc`.
pub struct ScoringEngine {
    embedder: Arc<dyn Embedder>,
    ticks: TickEmbeddings,
    top_k: usize,
}

impl ScoringEngine {
    /// Load the dataset, load the configured embedding model and embed every
    /// tick example.
    ///
    /// # Errors
    ///
    /// Returns [`TickError::Dataset`] for a missing or malformed dataset and
    /// [`TickError::ModelLoad`] if the model cannot be loaded or used. Both are
    /// fatal; the caller must not serve traffic.
    pub async fn bootstrap(config: &AppConfig) -> Result<Self, TickError> {
        let dataset = nre_core::load_ticks(&config.ticks_path)?;
        tracing::info!(
            path = %config.ticks_path.display(),
            ticks = dataset.len(),
            examples = dataset.example_count(),
            "loaded tick dataset"
        );

        let embedder = embedder_from_config(config)?;
        Self::new(embedder, &dataset, config.top_k).await
    }

    /// Build an engine from an existing embedder and dataset.
    ///
    /// # Errors
    ///
    /// Returns [`TickError::ModelLoad`] if embedding the tick examples fails.
    pub async fn new(
        embedder: Arc<dyn Embedder>,
        dataset: &TickDataset,
        top_k: usize,
    ) -> Result<Self, TickError> {
        let ticks = TickEmbeddings::build(dataset, embedder.as_ref()).await?;
        Ok(Self::from_parts(embedder, ticks, top_k))
    }

    /// Assemble an engine from an embedder and an already built tick cache.
    ///
    /// `top_k` is clamped to `1..=DEFAULT_TOP_K`.
    #[must_use]
    pub fn from_parts(embedder: Arc<dyn Embedder>, ticks: TickEmbeddings, top_k: usize) -> Self {
        Self {
            embedder,
            ticks,
            top_k: top_k.clamp(1, DEFAULT_TOP_K),
        }
    }

    #[must_use]
    pub fn ticks(&self) -> &TickEmbeddings {
        &self.ticks
    }

    #[must_use]
    pub fn model_name(&self) -> &str {
        self.embedder.model_name()
    }

    #[must_use]
    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Score one text by mean similarity and rank the top ticks.
    ///
    /// # Errors
    ///
    /// Returns [`TickError::Inference`] (or a backend error) if embedding the
    /// text fails. The tick cache is never touched.
    pub async fn analyze_text(&self, text: &str) -> Result<TextAnalysis, TickError> {
        let vector = self.embedder.embed_one(text).await?;
        self.check_dimensions(std::slice::from_ref(&vector))?;

        let scores = mean_similarity_scores(&vector, &self.ticks);
        let top_ticks = rank_top_k(&scores, self.top_k);

        tracing::debug!(
            chars = text.len(),
            top = ?top_ticks.first(),
            "scored text by mean similarity"
        );

        Ok(TextAnalysis { scores, top_ticks })
    }

    /// Score a batch of samples by best pairwise similarity.
    ///
    /// An empty batch returns an empty map without calling the embedder.
    ///
    /// # Errors
    ///
    /// Returns [`TickError::Inference`] (or a backend error) if embedding the
    /// samples fails.
    pub async fn score_samples(&self, samples: &[String]) -> Result<ScoreMap, TickError> {
        if samples.is_empty() {
            tracing::debug!("no samples to score; returning empty scores");
            return Ok(ScoreMap::new());
        }

        let texts: Vec<&str> = samples.iter().map(String::as_str).collect();
        let vectors = self.embedder.embed(&texts).await?;
        if vectors.len() != texts.len() {
            return Err(TickError::Inference(format!(
                "embedder returned {} vectors for {} samples",
                vectors.len(),
                texts.len()
            )));
        }
        self.check_dimensions(&vectors)?;

        let scores = max_similarity_scores(&vectors, &self.ticks);
        tracing::debug!(samples = samples.len(), "scored samples by max similarity");
        Ok(scores)
    }

    fn check_dimensions(&self, vectors: &[Vec<f32>]) -> Result<(), TickError> {
        let expected = self.ticks.dimensions();
        if expected == 0 {
            return Ok(());
        }
        match vectors.iter().find(|v| v.len() != expected) {
            Some(bad) => Err(TickError::Inference(format!(
                "embedding has {} dimensions, tick cache has {expected}",
                bad.len()
            ))),
            None => Ok(()),
        }
    }
}

/// Construct the embedder selected by `config.embedding_backend`.
///
/// # Errors
///
/// Returns [`TickError::ModelLoad`] if the backend cannot be created.
pub fn embedder_from_config(config: &AppConfig) -> Result<Arc<dyn Embedder>, TickError> {
    match config.embedding_backend {
        EmbeddingBackend::Tei => {
            let url = config
                .tei_url
                .as_deref()
                .ok_or_else(|| TickError::ModelLoad("NRE_TEI_URL is not set".to_string()))?;
            let client = TeiClient::new(url, config.tei_timeout_secs)
                .map_err(|e| TickError::ModelLoad(format!("TEI client: {e}")))?;
            Ok(Arc::new(client))
        }
        EmbeddingBackend::Local => local_embedder(config),
    }
}

#[cfg(feature = "local-inference")]
fn local_embedder(config: &AppConfig) -> Result<Arc<dyn Embedder>, TickError> {
    use crate::local::{FastEmbedProvider, LocalEmbeddingModel};

    let kind = LocalEmbeddingModel::from_name(&config.embedding_model)?;
    let provider = FastEmbedProvider::new(kind, config.model_cache_dir.clone())?;
    Ok(Arc::new(provider))
}

#[cfg(not(feature = "local-inference"))]
fn local_embedder(_config: &AppConfig) -> Result<Arc<dyn Embedder>, TickError> {
    Err(TickError::ModelLoad(
        "built without the `local-inference` feature; set NRE_EMBEDDING_BACKEND=tei".to_string(),
    ))
}
