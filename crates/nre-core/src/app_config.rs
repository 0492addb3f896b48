use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Where sentence embeddings come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingBackend {
    /// In-process ONNX model loaded at startup.
    Local,
    /// Remote Text Embeddings Inference server.
    Tei,
}

impl std::fmt::Display for EmbeddingBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmbeddingBackend::Local => write!(f, "local"),
            EmbeddingBackend::Tei => write!(f, "tei"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub ticks_path: PathBuf,
    pub embedding_backend: EmbeddingBackend,
    pub embedding_model: String,
    pub model_cache_dir: Option<PathBuf>,
    /// Required when `embedding_backend` is [`EmbeddingBackend::Tei`].
    pub tei_url: Option<String>,
    pub tei_timeout_secs: u64,
    pub scraper_program: String,
    /// Passed as the first argument to `scraper_program`; `None` runs the program directly.
    pub scraper_script: Option<String>,
    pub scraper_timeout_secs: u64,
    pub top_k: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("ticks_path", &self.ticks_path)
            .field("embedding_backend", &self.embedding_backend)
            .field("embedding_model", &self.embedding_model)
            .field("model_cache_dir", &self.model_cache_dir)
            .field("tei_url", &self.tei_url.as_ref().map(|_| "[redacted]"))
            .field("tei_timeout_secs", &self.tei_timeout_secs)
            .field("scraper_program", &self.scraper_program)
            .field("scraper_script", &self.scraper_script)
            .field("scraper_timeout_secs", &self.scraper_timeout_secs)
            .field("top_k", &self.top_k)
            .finish()
    }
}
