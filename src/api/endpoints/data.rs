//! Dataset paging and session inspection.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::AppContext;
use crate::assets::dataset::MAX_PAGE_SIZE;
use crate::views::{SessionId, ViewId};

pub const DEFAULT_PAGE_SIZE: usize = 100;

#[derive(Debug, Deserialize)]
pub struct DatasetQuery {
    #[serde(default)]
    pub offset: usize,
    pub limit: Option<usize>,
}

/// `GET /api/dataset?offset&limit`: one page of historical rows.
pub async fn dataset(
    State(ctx): State<AppContext>,
    query: Result<Query<DatasetQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query?;
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE);
    if limit == 0 || limit > MAX_PAGE_SIZE {
        return Err(ApiError::BadRequest(format!(
            "limit must be between 1 and {MAX_PAGE_SIZE}"
        )));
    }
    Ok(Json(ctx.assets.dataset.page(query.offset, limit)).into_response())
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub view: ViewId,
    pub label: &'static str,
}

/// `GET /api/session`: the caller's current view.
pub async fn session(
    State(ctx): State<AppContext>,
    Extension(session): Extension<SessionId>,
) -> Result<Json<SessionResponse>, ApiError> {
    let view = ctx.read_sessions()?.current_view(session);
    Ok(Json(SessionResponse {
        view,
        label: view.label(),
    }))
}
