//! Shared state for the dashboard router.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::api::error::ApiError;
use crate::assets::Assets;
use crate::prediction::PredictionHandler;
use crate::views::SessionStore;

// ═══════════════════════════════════════════════════════════
// API context
// ═══════════════════════════════════════════════════════════

/// Shared context for all routes and middleware.
///
/// Assets are read-only `Arc` handles; the session store is the only
/// mutable state and its guards are never held across an `.await`.
#[derive(Clone)]
pub struct AppContext {
    pub assets: Assets,
    pub handler: PredictionHandler,
    pub sessions: Arc<RwLock<SessionStore>>,
    pub started_at: DateTime<Utc>,
}

impl AppContext {
    pub fn new(assets: Assets, session_ttl: Duration) -> Self {
        let handler = PredictionHandler::new(assets.predictor());
        Self {
            assets,
            handler,
            sessions: Arc::new(RwLock::new(SessionStore::new(session_ttl))),
            started_at: Utc::now(),
        }
    }

    /// Swap the model behind the prediction handler.
    #[cfg(test)]
    pub(crate) fn with_predictor(mut self, predictor: Arc<dyn crate::model::Predictor>) -> Self {
        self.handler = PredictionHandler::new(predictor);
        self
    }

    pub fn read_sessions(&self) -> Result<RwLockReadGuard<'_, SessionStore>, ApiError> {
        self.sessions
            .read()
            .map_err(|_| ApiError::Internal("session lock".into()))
    }

    pub fn write_sessions(&self) -> Result<RwLockWriteGuard<'_, SessionStore>, ApiError> {
        self.sessions
            .write()
            .map_err(|_| ApiError::Internal("session lock".into()))
    }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::assets::AssetLoader;
    use crate::config::DashboardConfig;

    /// Context over fixture assets. Keep the tempdir alive for the test.
    pub(crate) fn test_context() -> (AppContext, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        crate::assets::tests::write_fixture_assets(dir.path());
        let assets = AssetLoader::new(DashboardConfig::with_assets_dir(dir.path()))
            .load_all()
            .unwrap();
        (AppContext::new(assets, Duration::from_secs(60)), dir)
    }

    #[test]
    fn clones_share_session_store() {
        let (ctx, _dir) = test_context();
        let other = ctx.clone();
        let (id, _) = ctx.write_sessions().unwrap().resolve(None);
        assert_eq!(other.read_sessions().unwrap().active_count(), 1);
        assert!(other.read_sessions().unwrap().current_view(id) == crate::views::ViewId::Home);
    }

    #[test]
    fn handler_uses_loaded_model() {
        let (ctx, _dir) = test_context();
        let fields = crate::prediction::PredictionFields::from_values([45, 2, 175, 80, 180, 85, 1, 1, 1, 2]);
        let prediction = ctx.handler.submit(&fields).unwrap();
        assert!(prediction.outcome.is_risk());
    }
}
