//! Shared configuration and category dataset types for the narrative risk engine.

pub mod app_config;
pub mod config;
pub mod ticks;

pub use app_config::{AppConfig, EmbeddingBackend, Environment};
pub use config::{load_app_config, load_app_config_from_env, MAX_TOP_K};
pub use ticks::{load_ticks, Tick, TickDataset};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required env var: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read tick dataset at {path}: {source}")]
    DatasetIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse tick dataset: {0}")]
    DatasetParse(#[from] serde_json::Error),

    #[error("invalid tick dataset: {0}")]
    DatasetValidation(String),
}
