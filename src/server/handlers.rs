use axum::{extract::State, http::StatusCode, Json};
use log::{error, info};
use std::sync::Arc;

use super::models::{ClassifyRequest, ClassifyResult, ErrorResponse, HealthResponse};
use super::AppState;

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let info = state.classifier.info();
    Json(HealthResponse {
        status: "ok".to_string(),
        checkpoint: info.checkpoint_dir,
        num_labels: info.num_labels,
    })
}

/// Classifies a batch of queries. Empty input is a client error; any
/// inference failure is logged and surfaced as an opaque 500.
pub async fn classify(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ClassifyRequest>,
) -> Result<Json<Vec<ClassifyResult>>, (StatusCode, Json<ErrorResponse>)> {
    if payload.queries.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "No queries provided".to_string(),
            }),
        ));
    }

    info!("Classifying {} queries", payload.queries.len());
    match state.classifier.classify_batch(&payload.queries) {
        Ok(results) => Ok(Json(results.into_iter().map(ClassifyResult::from).collect())),
        Err(e) => {
            error!("Inference failed: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Model inference failed. Try reducing input size or batch size."
                        .to_string(),
                }),
            ))
        }
    }
}
