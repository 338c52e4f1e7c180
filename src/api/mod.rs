//! HTTP surface of the dashboard.
//!
//! Browser pages at the root (session cookie scoped), JSON endpoints under
//! `/api/`. `build_router()` returns a `Router` that can be mounted on any
//! axum server; `start_server()` runs it in a background task.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use error::ApiError;
pub use router::build_router;
pub use server::{start_server, DashboardServer, ServerError};
pub use types::AppContext;
