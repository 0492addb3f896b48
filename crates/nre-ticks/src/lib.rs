//! Narrative risk ("tick") scoring.
//!
//! Embeds every example sentence of every tick once at startup, then scores
//! incoming text by cosine similarity against those cached vectors. Two
//! aggregation policies are exposed and kept separate on purpose:
//!
//! - [`mean_similarity_scores`]: one text, mean similarity per tick, ranked.
//! - [`max_similarity_scores`]: a batch of samples, best pairwise match per tick.

pub mod cache;
pub mod embedder;
pub mod engine;
pub mod error;
pub mod scorer;
pub mod similarity;
pub mod tei;
pub mod types;

#[cfg(feature = "local-inference")]
pub mod local;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use cache::TickEmbeddings;
pub use embedder::Embedder;
pub use engine::{embedder_from_config, ScoringEngine, DEFAULT_TOP_K};
pub use error::TickError;
pub use scorer::{max_similarity_scores, mean_similarity_scores, rank_top_k};
pub use similarity::cosine_similarity;
pub use tei::TeiClient;
pub use types::{ScoreMap, TextAnalysis};

#[cfg(feature = "local-inference")]
pub use local::{FastEmbedProvider, LocalEmbeddingModel};
