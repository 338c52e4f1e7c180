//! Chart and illustration bytes.

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::Response;

use crate::api::error::ApiError;
use crate::api::types::AppContext;

fn image_response(content_type: &str, bytes: Vec<u8>) -> Result<Response, ApiError> {
    Response::builder()
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CACHE_CONTROL, "public, max-age=3600")
        .body(Body::from(bytes))
        .map_err(|e| ApiError::Internal(format!("image response: {e}")))
}

/// `GET /charts/:index`: chart `index` (0–4), served as stored.
pub async fn chart(
    State(ctx): State<AppContext>,
    Path(index): Path<String>,
) -> Result<Response, ApiError> {
    let chart = index
        .parse::<usize>()
        .ok()
        .and_then(|i| ctx.assets.charts.get(i))
        .ok_or_else(|| ApiError::NotFound(format!("No chart {index}")))?;
    image_response(&chart.content_type, chart.bytes.clone())
}

/// `GET /illustration.png`: the Home illustration at 500×300.
pub async fn illustration(State(ctx): State<AppContext>) -> Result<Response, ApiError> {
    image_response("image/png", ctx.assets.illustration.png.clone())
}
