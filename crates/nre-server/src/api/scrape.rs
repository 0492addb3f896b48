use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use nre_ticks::ScoreMap;
use serde::{Deserialize, Serialize};

use super::{map_json_rejection, map_tick_error, ApiError, AppState};
use crate::middleware::RequestId;

#[derive(Debug, Deserialize)]
pub(super) struct ScrapeRequest {
    company_name: String,
    topic: String,
}

#[derive(Debug, Serialize)]
pub(super) struct ScrapeScores {
    company: String,
    topic: String,
    sample_count: usize,
    scores: ScoreMap,
}

/// POST /scrape — run the external scraper, then score what it returned.
///
/// A failed scrape is the empty-batch case: `sample_count` 0 and no scores.
pub(super) async fn scrape_and_score(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<ScrapeRequest>, JsonRejection>,
) -> Result<Json<ScrapeScores>, ApiError> {
    let Json(request) = body.map_err(|e| map_json_rejection(req_id.0.clone(), &e))?;

    let samples = state
        .scraper
        .scrape(&request.company_name, &request.topic)
        .await;

    let scores = state
        .engine
        .score_samples(&samples)
        .await
        .map_err(|e| map_tick_error(req_id.0, &e))?;

    Ok(Json(ScrapeScores {
        company: request.company_name,
        topic: request.topic,
        sample_count: samples.len(),
        scores,
    }))
}
