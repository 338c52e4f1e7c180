//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::AppContext;
use crate::model::Predictor;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub model: String,
    pub model_source: String,
    pub model_digest: String,
    pub dataset_rows: usize,
    pub active_sessions: usize,
    pub started_at: String,
}

/// `GET /api/health`: liveness plus what was loaded at startup.
pub async fn check(State(ctx): State<AppContext>) -> Result<Json<HealthResponse>, ApiError> {
    let active_sessions = ctx.read_sessions()?.active_count();

    Ok(Json(HealthResponse {
        status: "ok",
        version: crate::config::APP_VERSION,
        model: ctx.assets.model.describe(),
        model_source: ctx.assets.model.source().display().to_string(),
        model_digest: ctx.assets.model.digest().to_string(),
        dataset_rows: ctx.assets.dataset.len(),
        active_sessions,
        started_at: ctx.started_at.to_rfc3339(),
    }))
}
