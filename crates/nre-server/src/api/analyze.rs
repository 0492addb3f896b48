use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection, StringRejection},
        Query, State,
    },
    Extension, Json,
};
use nre_ticks::{ScoreMap, TextAnalysis};
use serde::{Deserialize, Serialize};

use super::{map_json_rejection, map_tick_error, ApiError, AppState};
use crate::middleware::RequestId;

#[derive(Debug, Deserialize)]
pub(super) struct TextQuery {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CompanyTextRequest {
    company_name: String,
    topic: String,
    #[serde(default)]
    text_samples: Vec<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct CompanyScores {
    company: String,
    topic: String,
    scores: ScoreMap,
}

/// POST /analyze/ — mean-similarity scores and top ticks for one text.
///
/// The text comes from the `text` query parameter when present, otherwise
/// from the request body (plain text or a JSON string).
pub(super) async fn analyze_text(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<TextQuery>, QueryRejection>,
    body: Result<String, StringRejection>,
) -> Result<Json<TextAnalysis>, ApiError> {
    let Query(query) =
        query.map_err(|e| ApiError::new(&req_id.0, "validation_error", e.body_text()))?;
    let body = body.map_err(|e| ApiError::new(&req_id.0, "validation_error", e.body_text()))?;

    let Some(text) = extract_text(query.text, &body) else {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "text must be a non-empty string",
        ));
    };

    let analysis = state
        .engine
        .analyze_text(&text)
        .await
        .map_err(|e| map_tick_error(req_id.0, &e))?;

    Ok(Json(analysis))
}

/// POST /analyze — max-similarity scores for a company/topic sample batch.
pub(super) async fn analyze_company_text(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<CompanyTextRequest>, JsonRejection>,
) -> Result<Json<CompanyScores>, ApiError> {
    let Json(request) = body.map_err(|e| map_json_rejection(req_id.0.clone(), &e))?;

    let scores = state
        .engine
        .score_samples(&request.text_samples)
        .await
        .map_err(|e| map_tick_error(req_id.0, &e))?;

    Ok(Json(CompanyScores {
        company: request.company_name,
        topic: request.topic,
        scores,
    }))
}

fn extract_text(query_text: Option<String>, body: &str) -> Option<String> {
    let text = match query_text {
        Some(text) if !text.trim().is_empty() => text,
        _ => {
            let trimmed = body.trim();
            if trimmed.starts_with('"') {
                serde_json::from_str::<String>(trimmed).unwrap_or_else(|_| body.to_string())
            } else {
                body.to_string()
            }
        }
    };

    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_text_wins_over_body() {
        assert_eq!(
            extract_text(Some("from query".to_string()), "from body").as_deref(),
            Some("from query")
        );
    }

    #[test]
    fn blank_query_falls_back_to_body() {
        assert_eq!(
            extract_text(Some("  ".to_string()), "from body").as_deref(),
            Some("from body")
        );
    }

    #[test]
    fn json_string_body_is_decoded() {
        assert_eq!(
            extract_text(None, "\"quoted \\\"text\\\"\"").as_deref(),
            Some("quoted \"text\"")
        );
    }

    #[test]
    fn malformed_json_string_is_used_verbatim() {
        assert_eq!(
            extract_text(None, "\"unterminated").as_deref(),
            Some("\"unterminated")
        );
    }

    #[test]
    fn empty_inputs_are_rejected() {
        assert!(extract_text(None, "").is_none());
        assert!(extract_text(None, "\"  \"").is_none());
    }
}
