use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "Cardio Dashboard";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default asset file names, as produced by the data-preparation pipeline.
pub const DATASET_FILE: &str = "cardio-train-edited.csv";
pub const MODEL_FILE: &str = "Prediction_model.json";
pub const ILLUSTRATION_FILE: &str = "Edited.jpg";

/// Loopback only; override with `CARDIO_BIND`.
pub const DEFAULT_BIND: SocketAddr = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 8501));
pub const DEFAULT_SESSION_TTL_SECS: u64 = 1800;

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "info,cardio_dashboard=debug,tower_http=info"
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} is not a valid socket address: {value}")]
    InvalidBind { var: &'static str, value: String },
    #[error("{var} must be a positive integer, got {value}")]
    InvalidNumber { var: &'static str, value: String },
}

/// Runtime configuration. Only asset locations, the bind address and the
/// session idle timeout are configurable.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub assets_dir: PathBuf,
    pub dataset_path: PathBuf,
    pub model_path: PathBuf,
    pub illustration_path: PathBuf,
    pub bind: SocketAddr,
    pub session_ttl: Duration,
}

impl DashboardConfig {
    /// Defaults rooted at `assets_dir`.
    pub fn with_assets_dir(assets_dir: impl Into<PathBuf>) -> Self {
        let assets_dir = assets_dir.into();
        Self {
            dataset_path: assets_dir.join(DATASET_FILE),
            model_path: assets_dir.join(MODEL_FILE),
            illustration_path: assets_dir.join(ILLUSTRATION_FILE),
            assets_dir,
            bind: DEFAULT_BIND,
            session_ttl: Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
        }
    }

    /// Resolve from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve from an arbitrary variable source (tests pass a map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let assets_dir = lookup("CARDIO_ASSETS_DIR").unwrap_or_else(|| "assets".to_string());
        let mut config = Self::with_assets_dir(assets_dir);

        if let Some(dataset) = lookup("CARDIO_DATASET") {
            config.dataset_path = resolve(&config.assets_dir, &dataset);
        }
        if let Some(model) = lookup("CARDIO_MODEL") {
            config.model_path = resolve(&config.assets_dir, &model);
        }
        if let Some(bind) = lookup("CARDIO_BIND") {
            config.bind = bind.parse().map_err(|_| ConfigError::InvalidBind {
                var: "CARDIO_BIND",
                value: bind.clone(),
            })?;
        }
        if let Some(ttl) = lookup("CARDIO_SESSION_TTL_SECS") {
            let secs = ttl
                .parse::<u64>()
                .ok()
                .filter(|s| *s > 0)
                .ok_or_else(|| ConfigError::InvalidNumber {
                    var: "CARDIO_SESSION_TTL_SECS",
                    value: ttl.clone(),
                })?;
            config.session_ttl = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Path of the n-th chart image (`output.png`, `output1.png`, ...).
    pub fn chart_path(&self, index: usize) -> PathBuf {
        if index == 0 {
            self.assets_dir.join("output.png")
        } else {
            self.assets_dir.join(format!("output{index}.png"))
        }
    }
}

/// Relative overrides are taken relative to the assets directory.
fn resolve(assets_dir: &Path, value: &str) -> PathBuf {
    let path = PathBuf::from(value);
    if path.is_absolute() {
        path
    } else {
        assets_dir.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_env() {
        let config = DashboardConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.assets_dir, PathBuf::from("assets"));
        assert!(config.dataset_path.ends_with(DATASET_FILE));
        assert!(config.model_path.ends_with(MODEL_FILE));
        assert_eq!(config.bind, DEFAULT_BIND);
        assert_eq!(config.bind.to_string(), "127.0.0.1:8501");
        assert_eq!(config.session_ttl, Duration::from_secs(1800));
    }

    #[test]
    fn relative_overrides_live_under_assets_dir() {
        let config = DashboardConfig::from_lookup(lookup(&[
            ("CARDIO_ASSETS_DIR", "/srv/cardio"),
            ("CARDIO_MODEL", "model.onnx"),
            ("CARDIO_DATASET", "/data/train.csv"),
        ]))
        .unwrap();
        assert_eq!(config.model_path, PathBuf::from("/srv/cardio/model.onnx"));
        assert_eq!(config.dataset_path, PathBuf::from("/data/train.csv"));
    }

    #[test]
    fn invalid_bind_is_rejected() {
        let err = DashboardConfig::from_lookup(lookup(&[("CARDIO_BIND", "not-an-addr")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBind { .. }));
    }

    #[test]
    fn bind_override_replaces_default() {
        let config =
            DashboardConfig::from_lookup(lookup(&[("CARDIO_BIND", "0.0.0.0:9000")])).unwrap();
        assert_eq!(config.bind.port(), 9000);
        assert_ne!(config.bind, DEFAULT_BIND);
        assert_eq!(DashboardConfig::with_assets_dir("a").bind, DEFAULT_BIND);
    }

    #[test]
    fn zero_ttl_is_rejected() {
        let err = DashboardConfig::from_lookup(lookup(&[("CARDIO_SESSION_TTL_SECS", "0")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber { .. }));
    }

    #[test]
    fn chart_paths_follow_pipeline_naming() {
        let config = DashboardConfig::with_assets_dir("a");
        assert_eq!(config.chart_path(0), PathBuf::from("a/output.png"));
        assert_eq!(config.chart_path(4), PathBuf::from("a/output4.png"));
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }
}
