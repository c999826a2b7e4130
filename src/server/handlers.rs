// HTTP request handlers

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    routing::get,
    Json, Router,
};
use std::sync::Arc;

use super::error::ApiError;
use super::types::{HealthResponse, RefineQuery, RefineRequest, RefineResponse};
use super::RefineServer;

/// Build the API router over shared server state.
pub fn create_router(server: Arc<RefineServer>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/refine", get(handle_refine_query).post(handle_refine_json))
        .with_state(server)
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// `GET /api/refine?desiredOutput=...`
pub async fn handle_refine_query(
    State(server): State<Arc<RefineServer>>,
    Query(query): Query<RefineQuery>,
) -> Result<Json<RefineResponse>, ApiError> {
    refine(&server, query.desired_output).await
}

/// `POST /api/refine` with `{"desiredOutput": ...}`
pub async fn handle_refine_json(
    State(server): State<Arc<RefineServer>>,
    payload: Result<Json<RefineRequest>, JsonRejection>,
) -> Result<Json<RefineResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::InvalidBody {
        status: e.status(),
        message: e.body_text(),
    })?;
    refine(&server, request.desired_output).await
}

async fn refine(
    server: &RefineServer,
    desired_output: Option<String>,
) -> Result<Json<RefineResponse>, ApiError> {
    let desired_output = desired_output
        .filter(|d| !d.trim().is_empty())
        .ok_or(ApiError::MissingDesiredOutput)?;

    tracing::info!(desired_output = %desired_output, "Refine request");

    let report = match server.refinement().run(&desired_output).await {
        Ok(report) => report,
        Err(e) => {
            let err = ApiError::from(e);
            tracing::error!(status = %err.status_code(), "Refinement failed: {}", err);
            return Err(err);
        }
    };

    report
        .outcome
        .into_correct_prompt()
        .map(|correct_prompt| Json(RefineResponse { correct_prompt }))
        .ok_or(ApiError::NoPromptFound)
}
