//! TEI (Text Embeddings Inference) client for vector generation.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use crate::embedder::Embedder;
use crate::error::TickError;

/// Maximum number of texts per /embed call.
const BATCH_SIZE: usize = 64;

/// TEI HTTP client.
pub struct TeiClient {
    client: reqwest::Client,
    url: String,
    model_name: String,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    inputs: &'a [&'a str],
}

impl TeiClient {
    /// Create a new `TeiClient` pointed at `tei_url` (without the `/embed` suffix).
    ///
    /// # Errors
    ///
    /// Returns [`TickError::Http`] if the HTTP client cannot be built.
    pub fn new(tei_url: &str, timeout_secs: u64) -> Result<Self, TickError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        let base = tei_url.trim_end_matches('/');
        Ok(Self {
            client,
            url: format!("{base}/embed"),
            model_name: format!("tei:{base}"),
        })
    }
}

#[async_trait]
impl Embedder for TeiClient {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Generate embeddings for a batch of texts.
    ///
    /// Texts are batched into groups of [`BATCH_SIZE`] (64) per request.
    /// Returns one embedding vector per input text, in the same order.
    ///
    /// # Errors
    ///
    /// Returns [`TickError::Tei`] if the request fails or the response
    /// cannot be parsed.
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, TickError> {
        let mut all_embeddings = Vec::with_capacity(texts.len());

        for chunk in texts.chunks(BATCH_SIZE) {
            let request = EmbedRequest { inputs: chunk };
            let response = self
                .client
                .post(&self.url)
                .json(&request)
                .send()
                .await
                .map_err(|e| TickError::Tei(format!("TEI request failed: {e}")))?;

            if !response.status().is_success() {
                return Err(TickError::Tei(format!(
                    "TEI returned status {}",
                    response.status()
                )));
            }

            let embeddings: Vec<Vec<f32>> = response
                .json()
                .await
                .map_err(|e| TickError::Tei(format!("TEI response parse error: {e}")))?;

            if embeddings.len() != chunk.len() {
                return Err(TickError::Tei(format!(
                    "TEI returned {} embeddings for {} inputs",
                    embeddings.len(),
                    chunk.len()
                )));
            }

            all_embeddings.extend(embeddings);
        }

        tracing::debug!(count = all_embeddings.len(), "TEI embedded texts");
        Ok(all_embeddings)
    }
}
