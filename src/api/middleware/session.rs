//! Session cookie middleware.
//!
//! Resolves the `cardio_session` cookie to a live session (creating one
//! when absent, unknown or expired), injects the `SessionId` into request
//! extensions, and sets the cookie on the response for new sessions.

use axum::http::{header, HeaderMap, HeaderValue, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::api::error::ApiError;
use crate::api::types::AppContext;
use crate::views::SessionId;

pub const SESSION_COOKIE: &str = "cardio_session";

/// Pull the session id out of the `Cookie` header(s), if well formed.
pub fn session_from_cookies(headers: &HeaderMap) -> Option<SessionId> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| value.parse().ok())
}

fn session_cookie(id: SessionId) -> String {
    format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax")
}

/// Accesses `AppContext` from request extensions (injected by Extension layer).
pub async fn attach_session(req: Request<axum::body::Body>, next: Next) -> Response {
    match attach_session_inner(req, next).await {
        Ok(resp) => resp,
        Err(err) => err.into_response(),
    }
}

async fn attach_session_inner(
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let ctx: AppContext = req
        .extensions()
        .get::<AppContext>()
        .cloned()
        .ok_or(ApiError::Internal("missing app context".into()))?;

    let presented = session_from_cookies(req.headers());
    let (id, created) = ctx.write_sessions()?.resolve(presented);
    if created {
        tracing::debug!(session = %id, "Session started");
    }

    req.extensions_mut().insert(id);
    let mut response = next.run(req).await;

    if created {
        let cookie = HeaderValue::from_str(&session_cookie(id))
            .map_err(|e| ApiError::Internal(format!("session cookie: {e}")))?;
        response.headers_mut().append(header::SET_COOKIE, cookie);
    }
    Ok(response)
}
