//! Browser-facing HTML routes.

use std::collections::HashMap;

use axum::extract::rejection::{FormRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::response::{Html, Redirect};
use axum::{Extension, Form};
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::AppContext;
use crate::prediction::{Field, PredictionFields, SubmitError};
use crate::views::render::{self, FormResult};
use crate::views::{SessionId, ViewId};

/// Rows per Data Overview page.
pub const ROWS_PER_PAGE: usize = 100;

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub offset: Option<usize>,
}

fn render_view(ctx: &AppContext, view: ViewId, offset: usize) -> String {
    let body = match view {
        ViewId::Home => render::render_home(),
        ViewId::Prediction => render::render_prediction(None, None),
        ViewId::Visualizations => render::render_visualizations(&ctx.assets.charts),
        ViewId::DataOverview => {
            render::render_data_overview(&ctx.assets.dataset.page(offset, ROWS_PER_PAGE))
        }
        ViewId::About => render::render_about(),
    };
    render::render_page(view, &body)
}

/// `GET /`: render the session's current view.
pub async fn index(
    State(ctx): State<AppContext>,
    Extension(session): Extension<SessionId>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Html<String>, ApiError> {
    let Query(query) = query?;
    let view = ctx.read_sessions()?.current_view(session);
    Ok(Html(render_view(&ctx, view, query.offset.unwrap_or(0))))
}

/// `GET|POST /view/:slug`: navigation action, then back to `/`.
pub async fn select_view(
    State(ctx): State<AppContext>,
    Extension(session): Extension<SessionId>,
    Path(slug): Path<String>,
) -> Result<Redirect, ApiError> {
    let view: ViewId = slug
        .parse()
        .map_err(|e: crate::views::UnknownView| ApiError::NotFound(e.to_string()))?;
    ctx.write_sessions()?.select_view(session, view);
    tracing::debug!(session = %session, view = view.slug(), "View selected");
    Ok(Redirect::to("/"))
}

/// Browsers post every field as text; keys outside the form are ignored.
fn fields_from_form(form: &HashMap<String, String>) -> PredictionFields {
    let mut fields = PredictionFields::default();
    for field in Field::ALL {
        if let Some(value) = form.get(field.key()) {
            fields.set(field, value.as_str().into());
        }
    }
    fields
}

/// `POST /predict`: the Predict action. Always answers with the
/// Prediction view; failures are shown in place of a result.
pub async fn submit_prediction(
    State(ctx): State<AppContext>,
    Extension(session): Extension<SessionId>,
    form: Result<Form<HashMap<String, String>>, FormRejection>,
) -> Result<Html<String>, ApiError> {
    let Form(form) = form?;
    ctx.write_sessions()?.select_view(session, ViewId::Prediction);

    let fields = fields_from_form(&form);
    let result = match ctx.handler.submit(&fields) {
        Ok(prediction) => FormResult::Predicted(prediction),
        Err(SubmitError::Invalid(err)) => FormResult::Invalid(err),
        Err(SubmitError::Prediction(err)) => {
            tracing::warn!(error = %err, "Prediction failed");
            FormResult::Failed
        }
    };

    let body = render::render_prediction(Some(&fields), Some(&result));
    Ok(Html(render::render_page(ViewId::Prediction, &body)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prediction::RawValue;

    #[test]
    fn form_fields_are_taken_by_key() {
        let form: HashMap<String, String> = [
            ("age", "45"),
            ("systolic_bp", " 130 "),
            ("unrelated", "x"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let fields = fields_from_form(&form);
        assert_eq!(fields.get(Field::Age), Some(&RawValue::Text("45".into())));
        assert_eq!(fields.get(Field::SystolicBp), Some(&RawValue::Text(" 130 ".into())));
        assert_eq!(fields.get(Field::Gender), None);
    }
}
