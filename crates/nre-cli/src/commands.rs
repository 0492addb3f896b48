//! Subcommand execution. Every command prints one JSON document.

use nre_core::AppConfig;
use nre_scraper::ScraperCommand;
use nre_ticks::ScoringEngine;
use serde_json::{json, Value};

use crate::Commands;

pub(crate) async fn run(config: &AppConfig, command: Commands) -> anyhow::Result<Value> {
    let engine = ScoringEngine::bootstrap(config).await?;
    let scraper = ScraperCommand::from_config(config);
    execute(&engine, &scraper, command).await
}

async fn execute(
    engine: &ScoringEngine,
    scraper: &ScraperCommand,
    command: Commands,
) -> anyhow::Result<Value> {
    match command {
        Commands::Ticks => Ok(tick_listing(engine)),
        Commands::Score { text } => {
            anyhow::ensure!(!text.trim().is_empty(), "text must be a non-empty string");
            let analysis = engine.analyze_text(&text).await?;
            Ok(serde_json::to_value(analysis)?)
        }
        Commands::Batch { samples } => {
            let scores = engine.score_samples(&samples).await?;
            Ok(json!({ "scores": scores }))
        }
        Commands::Scrape { company, topic } => {
            let samples = scraper.scrape(&company, &topic).await;
            scrape_output(engine, &company, &topic, &samples).await
        }
    }
}

async fn scrape_output(
    engine: &ScoringEngine,
    company: &str,
    topic: &str,
    samples: &[String],
) -> anyhow::Result<Value> {
    let scores = engine.score_samples(samples).await?;
    Ok(json!({
        "company": company,
        "topic": topic,
        "sample_count": samples.len(),
        "scores": scores,
    }))
}

fn tick_listing(engine: &ScoringEngine) -> Value {
    let ticks: Vec<Value> = engine
        .ticks()
        .iter()
        .map(|(name, vectors)| json!({ "name": name, "example_count": vectors.len() }))
        .collect();
    json!({
        "model": engine.model_name(),
        "dimensions": engine.ticks().dimensions(),
        "ticks": ticks,
    })
}
