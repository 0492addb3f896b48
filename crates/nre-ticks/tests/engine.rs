//! End-to-end scoring behavior with a deterministic embedder.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use nre_core::{AppConfig, EmbeddingBackend, Environment, TickDataset};
use nre_ticks::testing::{FailingEmbedder, VocabularyEmbedder};
use nre_ticks::{ScoringEngine, TickEmbeddings, TickError, DEFAULT_TOP_K};

fn earnings_dataset() -> TickDataset {
    TickDataset::from_json_str(
        r#"{
            "optimism": ["record profits", "strong growth"],
            "risk": ["missed guidance", "regulatory investigation"]
        }"#,
    )
    .expect("dataset")
}

fn many_ticks_dataset() -> TickDataset {
    TickDataset::from_pairs([
        ("supply", vec!["supply chain disruption"]),
        ("labor", vec!["labor strike"]),
        ("fraud", vec!["accounting fraud"]),
        ("debt", vec!["debt default"]),
        ("legal", vec!["class action lawsuit"]),
        ("cyber", vec!["data breach"]),
        ("esg", vec!["emissions scandal"]),
    ])
    .expect("dataset")
}

fn config_for(ticks_path: &Path, embedding_backend: EmbeddingBackend) -> AppConfig {
    AppConfig {
        env: Environment::Test,
        bind_addr: "127.0.0.1:0".parse().expect("addr"),
        log_level: "info".to_string(),
        ticks_path: ticks_path.to_path_buf(),
        embedding_backend,
        embedding_model: "all-MiniLM-L6-v2".to_string(),
        model_cache_dir: None,
        tei_url: None,
        tei_timeout_secs: 30,
        scraper_program: "node".to_string(),
        scraper_script: None,
        scraper_timeout_secs: 60,
        top_k: DEFAULT_TOP_K,
    }
}

fn dataset_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("dataset file");
    write!(file, "{contents}").expect("write dataset");
    file
}

async fn engine_for(dataset: &TickDataset) -> ScoringEngine {
    let embedder = Arc::new(VocabularyEmbedder::from_dataset(dataset));
    ScoringEngine::new(embedder, dataset, DEFAULT_TOP_K)
        .await
        .expect("engine")
}

#[tokio::test]
async fn missed_guidance_scores_as_risk() {
    let engine = engine_for(&earnings_dataset()).await;

    let analysis = engine
        .analyze_text("the company missed its earnings guidance")
        .await
        .expect("analysis");

    assert!(analysis.scores["risk"] > analysis.scores["optimism"]);
    assert_eq!(analysis.top_ticks.first().map(String::as_str), Some("risk"));
}

#[tokio::test]
async fn single_text_scores_every_cached_tick() {
    let dataset = many_ticks_dataset();
    let engine = engine_for(&dataset).await;

    let analysis = engine
        .analyze_text("a data breach and a labor strike")
        .await
        .expect("analysis");

    let score_keys: Vec<&str> = analysis.scores.keys().map(String::as_str).collect();
    let cache_keys: Vec<&str> = engine.ticks().categories().collect();
    assert_eq!(score_keys, cache_keys);
}

#[tokio::test]
async fn top_ticks_follow_descending_scores_with_stable_ties() {
    let dataset = many_ticks_dataset();
    let engine = engine_for(&dataset).await;

    let analysis = engine
        .analyze_text("data breach led to a class action lawsuit")
        .await
        .expect("analysis");

    assert_eq!(analysis.top_ticks.len(), 5);
    assert_eq!(analysis.top_ticks[..2], ["legal", "cyber"]);
    // Remaining ticks all score zero and keep dataset order.
    assert_eq!(analysis.top_ticks[2..], ["supply", "labor", "fraud"]);

    for pair in analysis.top_ticks.windows(2) {
        assert!(analysis.scores[&pair[0]] >= analysis.scores[&pair[1]]);
    }
}

#[tokio::test]
async fn oversized_top_k_still_returns_five_ticks() {
    let dataset = many_ticks_dataset();
    let embedder = Arc::new(VocabularyEmbedder::from_dataset(&dataset));
    let engine = ScoringEngine::new(embedder, &dataset, 10)
        .await
        .expect("engine");

    let analysis = engine
        .analyze_text("data breach led to a class action lawsuit")
        .await
        .expect("analysis");

    assert_eq!(engine.top_k(), 5);
    assert_eq!(analysis.scores.len(), 7);
    assert_eq!(analysis.top_ticks.len(), 5);
}

#[tokio::test]
async fn empty_batch_returns_empty_scores() {
    let engine = ScoringEngine::new(Arc::new(FailingEmbedder), &TickDataset::default(), 5)
        .await
        .expect("empty dataset never calls the embedder");

    let scores = engine.score_samples(&[]).await.expect("empty batch is not an error");
    assert!(scores.is_empty());
}

#[tokio::test]
async fn batch_scores_are_max_and_rounded() {
    let engine = engine_for(&earnings_dataset()).await;

    let samples = vec![
        "strong quarter".to_string(),
        "regulatory investigation opened".to_string(),
    ];
    let scores = engine.score_samples(&samples).await.expect("scores");

    assert_eq!(scores.len(), 2);
    assert_eq!(scores["risk"], 1.0);
    // "strong" vs "strong growth": 1 / sqrt(2)
    assert!((scores["optimism"] - 0.7071).abs() < 1e-6);
}

#[tokio::test]
async fn scoring_is_idempotent() {
    let engine = engine_for(&earnings_dataset()).await;
    let samples = vec!["missed guidance again".to_string(), "record profits".to_string()];

    let first = engine.analyze_text("missed guidance on profits").await.unwrap();
    let second = engine.analyze_text("missed guidance on profits").await.unwrap();
    assert_eq!(first, second);

    let batch_first = engine.score_samples(&samples).await.unwrap();
    let batch_second = engine.score_samples(&samples).await.unwrap();
    assert_eq!(batch_first, batch_second);
}

#[tokio::test]
async fn failing_model_at_startup_is_fatal() {
    let err = ScoringEngine::new(Arc::new(FailingEmbedder), &earnings_dataset(), 5)
        .await
        .err()
        .expect("startup must fail");
    assert!(matches!(err, TickError::ModelLoad(_)));
    assert!(err.is_fatal());
}

#[tokio::test]
async fn dimension_mismatch_at_request_time_is_inference_error() {
    let ticks = TickEmbeddings::from_vectors(vec![(
        "risk".to_string(),
        vec![vec![1.0, 0.0]],
    )])
    .expect("cache");
    let embedder = Arc::new(VocabularyEmbedder::new(["only", "three", "words"]));
    let engine = ScoringEngine::from_parts(embedder, ticks, 5);

    let err = engine.analyze_text("only three words").await.unwrap_err();
    assert!(matches!(err, TickError::Inference(ref m) if m.contains("3 dimensions")));

    let err = engine
        .score_samples(&["words".to_string()])
        .await
        .unwrap_err();
    assert!(matches!(err, TickError::Inference(_)));
    assert_eq!(engine.ticks().dimensions(), 2);
}

#[tokio::test]
async fn request_failure_does_not_touch_cache() {
    let dataset = earnings_dataset();
    let healthy = engine_for(&dataset).await;
    let ticks = healthy.ticks().clone();

    let engine = ScoringEngine::from_parts(Arc::new(FailingEmbedder), ticks, 5);
    let err = engine.analyze_text("missed guidance").await.unwrap_err();
    assert!(!err.is_fatal());

    let names: Vec<&str> = engine.ticks().categories().collect();
    assert_eq!(names, ["optimism", "risk"]);
    assert_eq!(engine.ticks().get("risk").map(<[Vec<f32>]>::len), Some(2));
}

#[tokio::test]
async fn malformed_dataset_fails_bootstrap() {
    let file = dataset_file(r#"{"risk": []}"#);
    let config = config_for(file.path(), EmbeddingBackend::Local);

    let err = ScoringEngine::bootstrap(&config)
        .await
        .err()
        .expect("bootstrap must fail");
    assert!(matches!(err, TickError::Dataset(_)), "got: {err:?}");
    assert!(err.is_fatal());
}

#[tokio::test]
async fn missing_dataset_fails_bootstrap() {
    let config = config_for(Path::new("/nonexistent/ticks.json"), EmbeddingBackend::Local);

    let err = ScoringEngine::bootstrap(&config)
        .await
        .err()
        .expect("bootstrap must fail");
    assert!(matches!(err, TickError::Dataset(_)), "got: {err:?}");
    assert!(err.is_fatal());
}

#[tokio::test]
async fn tei_backend_without_url_fails_bootstrap() {
    let file = dataset_file(r#"{"risk": ["missed guidance"]}"#);
    let config = config_for(file.path(), EmbeddingBackend::Tei);

    let err = ScoringEngine::bootstrap(&config)
        .await
        .err()
        .expect("bootstrap must fail");
    assert!(matches!(err, TickError::ModelLoad(_)), "got: {err:?}");
    assert!(err.is_fatal());
}

#[cfg(not(feature = "local-inference"))]
#[tokio::test]
async fn local_backend_needs_local_inference_feature() {
    let file = dataset_file(r#"{"risk": ["missed guidance"]}"#);
    let config = config_for(file.path(), EmbeddingBackend::Local);

    let err = ScoringEngine::bootstrap(&config)
        .await
        .err()
        .expect("bootstrap must fail");
    assert!(
        matches!(err, TickError::ModelLoad(ref m) if m.contains("local-inference")),
        "got: {err:?}"
    );
}
