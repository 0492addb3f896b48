use indexmap::IndexMap;
use serde::Serialize;

/// Tick name to score, in tick dataset order.
pub type ScoreMap = IndexMap<String, f32>;

/// Result of scoring a single text with mean similarity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextAnalysis {
    pub scores: ScoreMap,
    /// Highest-scoring tick names, best first.
    pub top_ticks: Vec<String>,
}
