use axum::{extract::State, Json};
use serde::Serialize;

use super::AppState;

#[derive(Debug, Serialize)]
pub(super) struct TickSummary {
    name: String,
    example_count: usize,
}

#[derive(Debug, Serialize)]
pub(super) struct TickListing {
    model: String,
    dimensions: usize,
    ticks: Vec<TickSummary>,
}

/// GET /ticks — categories held in the tick cache, in dataset order.
pub(super) async fn list_ticks(State(state): State<AppState>) -> Json<TickListing> {
    let engine = &state.engine;
    let ticks = engine
        .ticks()
        .iter()
        .map(|(name, vectors)| TickSummary {
            name: name.to_string(),
            example_count: vectors.len(),
        })
        .collect();

    Json(TickListing {
        model: engine.model_name().to_string(),
        dimensions: engine.ticks().dimensions(),
        ticks,
    })
}
