//! Precomputed tick example embeddings.

use nre_core::TickDataset;

use crate::embedder::Embedder;
use crate::error::TickError;

#[derive(Debug, Clone)]
struct TickVectors {
    name: String,
    vectors: Vec<Vec<f32>>,
}

/// Embeddings of every example sentence of every tick, in dataset order.
///
/// Built once and never mutated afterwards, so it can be shared across
/// requests behind an `Arc` without locking.
#[derive(Debug, Clone)]
pub struct TickEmbeddings {
    ticks: Vec<TickVectors>,
    dimensions: usize,
}

impl TickEmbeddings {
    /// Embed all example sentences of `dataset` in one pass.
    ///
    /// # Errors
    ///
    /// Returns [`TickError::ModelLoad`] if the embedder fails, returns the
    /// wrong number of vectors, or returns vectors of inconsistent dimension.
    pub async fn build(dataset: &TickDataset, embedder: &dyn Embedder) -> Result<Self, TickError> {
        let sentences: Vec<&str> = dataset
            .ticks()
            .iter()
            .flat_map(|t| t.examples.iter().map(String::as_str))
            .collect();

        if sentences.is_empty() {
            tracing::warn!("tick dataset is empty; every score result will be empty");
            return Ok(Self {
                ticks: Vec::new(),
                dimensions: 0,
            });
        }

        let mut vectors = embedder
            .embed(&sentences)
            .await
            .map_err(|e| TickError::ModelLoad(format!("embedding tick examples failed: {e}")))?
            .into_iter();

        if vectors.len() != sentences.len() {
            return Err(TickError::ModelLoad(format!(
                "embedder returned {} vectors for {} tick examples",
                vectors.len(),
                sentences.len()
            )));
        }

        let entries = dataset
            .ticks()
            .iter()
            .map(|tick| {
                let tick_vectors: Vec<Vec<f32>> =
                    vectors.by_ref().take(tick.examples.len()).collect();
                (tick.name.clone(), tick_vectors)
            })
            .collect();

        let cache = Self::from_vectors(entries)
            .map_err(|e| TickError::ModelLoad(format!("unusable tick embeddings: {e}")))?;

        tracing::info!(
            ticks = cache.len(),
            examples = sentences.len(),
            dimensions = cache.dimensions,
            model = embedder.model_name(),
            "tick embeddings ready"
        );

        Ok(cache)
    }

    /// Assemble a cache from already computed vectors.
    ///
    /// # Errors
    ///
    /// Returns [`TickError::Inference`] if vectors are empty-dimensioned or
    /// do not all share one dimension.
    pub fn from_vectors(entries: Vec<(String, Vec<Vec<f32>>)>) -> Result<Self, TickError> {
        let dimensions = entries
            .iter()
            .flat_map(|(_, vectors)| vectors.first())
            .map(Vec::len)
            .next()
            .unwrap_or(0);

        for (name, vectors) in &entries {
            if let Some(bad) = vectors.iter().find(|v| v.len() != dimensions || v.is_empty()) {
                return Err(TickError::Inference(format!(
                    "tick '{name}' has a {}-dimensional vector, expected {dimensions}",
                    bad.len()
                )));
            }
        }

        Ok(Self {
            ticks: entries
                .into_iter()
                .map(|(name, vectors)| TickVectors { name, vectors })
                .collect(),
            dimensions,
        })
    }

    /// Cached vectors for one tick, in example order.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[Vec<f32>]> {
        self.ticks
            .iter()
            .find(|t| t.name == name)
            .map(|t| t.vectors.as_slice())
    }

    /// Tick names in dataset order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.ticks.iter().map(|t| t.name.as_str())
    }

    /// `(name, vectors)` pairs in dataset order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Vec<f32>])> {
        self.ticks
            .iter()
            .map(|t| (t.name.as_str(), t.vectors.as_slice()))
    }

    /// Vector dimension shared by every cached embedding; `0` when empty.
    #[must_use]
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }
}
