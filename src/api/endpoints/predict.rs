//! JSON prediction endpoint.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::AppContext;
use crate::prediction::{Prediction, PredictionFields};

/// `POST /api/predict`: ten fields in, outcome plus diagnostics out.
/// Malformed bodies are 400; well-formed bodies with bad values are 422.
pub async fn predict(
    State(ctx): State<AppContext>,
    payload: Result<Json<PredictionFields>, JsonRejection>,
) -> Result<Json<Prediction>, ApiError> {
    let Json(fields) = payload?;
    Ok(Json(ctx.handler.submit(&fields)?))
}
