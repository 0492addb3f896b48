//! Score aggregation policies.
//!
//! The two policies answer different questions and must not be unified:
//! mean similarity describes how close one text sits to a tick's examples as a
//! whole, max similarity flags a tick as soon as any sample hits any example.

use crate::cache::TickEmbeddings;
use crate::similarity::{cosine_similarity, round4};
use crate::types::ScoreMap;

/// Mean cosine similarity of one text vector against each tick's examples.
///
/// Every tick in `ticks` receives a score. Scores are not rounded.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn mean_similarity_scores(text_vector: &[f32], ticks: &TickEmbeddings) -> ScoreMap {
    ticks
        .iter()
        .map(|(name, vectors)| {
            let score = if vectors.is_empty() {
                0.0
            } else {
                let sum: f32 = vectors
                    .iter()
                    .map(|example| cosine_similarity(text_vector, example))
                    .sum();
                sum / vectors.len() as f32
            };
            (name.to_string(), score)
        })
        .collect()
}

/// Maximum pairwise cosine similarity between any sample and any example,
/// per tick, rounded to 4 decimal places.
///
/// An empty `sample_vectors` yields an empty map rather than zero scores.
#[must_use]
pub fn max_similarity_scores(sample_vectors: &[Vec<f32>], ticks: &TickEmbeddings) -> ScoreMap {
    if sample_vectors.is_empty() {
        return ScoreMap::new();
    }

    ticks
        .iter()
        .map(|(name, vectors)| {
            let best = sample_vectors
                .iter()
                .flat_map(|sample| {
                    vectors
                        .iter()
                        .map(move |example| cosine_similarity(sample, example))
                })
                .fold(f32::NEG_INFINITY, f32::max);
            let score = if best.is_finite() { round4(best) } else { 0.0 };
            (name.to_string(), score)
        })
        .collect()
}

/// Names of the `k` highest-scoring ticks, best first.
///
/// The sort is stable, so equal scores keep map order. Ordering is total:
/// a NaN score sorts ahead of every finite one instead of breaking the sort.
#[must_use]
pub fn rank_top_k(scores: &ScoreMap, k: usize) -> Vec<String> {
    let mut ranked: Vec<(&String, f32)> = scores.iter().map(|(n, s)| (n, *s)).collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked
        .into_iter()
        .take(k)
        .map(|(name, _)| name.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticks() -> TickEmbeddings {
        TickEmbeddings::from_vectors(vec![
            ("alpha".to_string(), vec![vec![1.0, 0.0], vec![0.0, 1.0]]),
            ("beta".to_string(), vec![vec![-1.0, 0.0]]),
            ("gamma".to_string(), vec![vec![1.0, 1.0]]),
        ])
        .unwrap()
    }

    #[test]
    fn mean_scores_every_tick() {
        let scores = mean_similarity_scores(&[1.0, 0.0], &ticks());
        let keys: Vec<&str> = scores.keys().map(String::as_str).collect();
        assert_eq!(keys, ["alpha", "beta", "gamma"]);
        // alpha: mean(1.0, 0.0)
        assert!((scores["alpha"] - 0.5).abs() < 1e-6);
        assert!((scores["beta"] + 1.0).abs() < 1e-6);
        assert!((scores["gamma"] - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-6);
    }

    #[test]
    fn mean_scores_are_not_rounded() {
        let scores = mean_similarity_scores(&[1.0, 0.0], &ticks());
        assert_ne!(scores["gamma"], round4(scores["gamma"]));
    }

    #[test]
    fn max_scores_take_best_pair_across_samples() {
        let samples = vec![vec![0.0, 1.0], vec![-1.0, 0.0]];
        let scores = max_similarity_scores(&samples, &ticks());
        assert_eq!(scores["alpha"], 1.0);
        assert_eq!(scores["beta"], 1.0);
        assert!((scores["gamma"] - 0.7071).abs() < 1e-6);
    }

    #[test]
    fn max_scores_empty_batch_is_empty_map() {
        assert!(max_similarity_scores(&[], &ticks()).is_empty());
    }

    #[test]
    fn rank_orders_descending() {
        let scores = mean_similarity_scores(&[1.0, 0.0], &ticks());
        assert_eq!(rank_top_k(&scores, 5), ["gamma", "alpha", "beta"]);
    }

    #[test]
    fn rank_ties_keep_map_order() {
        let mut scores = ScoreMap::new();
        scores.insert("c".to_string(), 0.5);
        scores.insert("a".to_string(), 0.9);
        scores.insert("b".to_string(), 0.5);
        scores.insert("d".to_string(), 0.5);
        assert_eq!(rank_top_k(&scores, 3), ["a", "c", "b"]);
    }

    #[test]
    fn rank_truncates_to_k() {
        let scores: ScoreMap = (0..8u8)
            .map(|i| (format!("t{i}"), f32::from(i) / 10.0))
            .collect();
        let top = rank_top_k(&scores, 5);
        assert_eq!(top, ["t7", "t6", "t5", "t4", "t3"]);
    }

    #[test]
    fn rank_tolerates_nan_scores() {
        let mut scores = ScoreMap::new();
        scores.insert("low".to_string(), 0.1);
        scores.insert("broken".to_string(), f32::NAN);
        scores.insert("high".to_string(), 0.8);
        scores.insert("mid".to_string(), 0.4);

        let top = rank_top_k(&scores, 4);
        assert_eq!(top.len(), 4);
        let finite: Vec<&str> = top
            .iter()
            .map(String::as_str)
            .filter(|name| *name != "broken")
            .collect();
        assert_eq!(finite, ["high", "mid", "low"]);
    }
}
