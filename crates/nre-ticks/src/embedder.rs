use async_trait::async_trait;

use crate::error::TickError;

/// Turns text into fixed-dimension vectors.
///
/// Implementations must be deterministic for a fixed model and return exactly
/// one vector per input, in input order.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Human-readable model identifier, used in logs and the `/ticks` listing.
    fn model_name(&self) -> &str;

    /// Embed a batch of texts.
    ///
    /// # Errors
    ///
    /// Returns [`TickError`] if the backend fails or returns a vector count
    /// that does not match the input.
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, TickError>;

    /// Embed a single text.
    ///
    /// # Errors
    ///
    /// Same as [`Embedder::embed`].
    async fn embed_one(&self, text: &str) -> Result<Vec<f32>, TickError> {
        self.embed(&[text])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| TickError::Inference("embedder returned no vector".to_string()))
    }
}
