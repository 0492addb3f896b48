//! Deterministic embedders for tests that cannot download a model.

use async_trait::async_trait;
use nre_core::TickDataset;

use crate::embedder::Embedder;
use crate::error::TickError;

/// Bag-of-words embedder over a fixed vocabulary.
///
/// Each dimension counts one vocabulary word; words outside the vocabulary are
/// ignored, so unrelated text embeds to the zero vector.
#[derive(Debug, Clone)]
pub struct VocabularyEmbedder {
    vocabulary: Vec<String>,
}

impl VocabularyEmbedder {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut vocabulary: Vec<String> = Vec::new();
        for word in words {
            for token in tokenize(word.as_ref()) {
                if !vocabulary.contains(&token) {
                    vocabulary.push(token);
                }
            }
        }
        Self { vocabulary }
    }

    /// Vocabulary made of every word in the dataset's example sentences.
    #[must_use]
    pub fn from_dataset(dataset: &TickDataset) -> Self {
        Self::new(dataset.ticks().iter().flat_map(|t| t.examples.iter()))
    }

    #[must_use]
    pub fn dimensions(&self) -> usize {
        self.vocabulary.len()
    }

    fn encode(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0_f32; self.vocabulary.len()];
        for token in tokenize(text) {
            if let Some(idx) = self.vocabulary.iter().position(|w| *w == token) {
                vector[idx] += 1.0;
            }
        }
        vector
    }
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
}

#[async_trait]
impl Embedder for VocabularyEmbedder {
    fn model_name(&self) -> &str {
        "vocabulary"
    }

    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, TickError> {
        Ok(texts.iter().map(|t| self.encode(t)).collect())
    }
}

/// Embedder that always fails, for exercising error paths.
#[derive(Debug, Clone, Default)]
pub struct FailingEmbedder;

#[async_trait]
impl Embedder for FailingEmbedder {
    fn model_name(&self) -> &str {
        "failing"
    }

    async fn embed(&self, _texts: &[&str]) -> Result<Vec<Vec<f32>>, TickError> {
        Err(TickError::Inference("model offline".to_string()))
    }
}
