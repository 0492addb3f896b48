use thiserror::Error;

#[derive(Debug, Error)]
pub enum TickError {
    /// The embedding model could not be loaded or produced unusable output at startup.
    #[error("embedding model unavailable: {0}")]
    ModelLoad(String),

    #[error("tick dataset error: {0}")]
    Dataset(#[from] nre_core::ConfigError),

    /// Embedding a request's text failed. Never affects the tick cache.
    #[error("inference failed: {0}")]
    Inference(String),

    #[error("TEI embed error: {0}")]
    Tei(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl TickError {
    /// Startup failures the process must not serve traffic through.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::ModelLoad(_) | Self::Dataset(_))
    }
}
