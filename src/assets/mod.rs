//! Asset loading: dataset, model, charts, illustration.
//!
//! Each asset is read from disk at most once per process. Handles are
//! `Arc`s so every caller sees the same instance, and nothing is mutated
//! after load.

pub mod dataset;
pub mod images;

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use thiserror::Error;

use crate::config::DashboardConfig;
use crate::model::{self, ModelError, ModelFormat, ModelHandle, Predictor};

pub use dataset::{Dataset, DatasetPage};
pub use images::{Chart, ChartGallery, Illustration};

/// Fatal startup error: a backing file is missing or unusable.
#[derive(Error, Debug)]
pub enum AssetError {
    #[error("Asset not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed dataset {path}: {reason}")]
    MalformedDataset { path: PathBuf, reason: String },

    #[error("Dataset {path} is missing required column '{column}'")]
    MissingColumn { path: PathBuf, column: &'static str },

    #[error("Model artifact {path}: {source}")]
    Model {
        path: PathBuf,
        #[source]
        source: ModelError,
    },

    #[error("Image {path} could not be used: {reason}")]
    Image { path: PathBuf, reason: String },
}

pub(crate) fn read_asset(path: &Path) -> Result<Vec<u8>, AssetError> {
    std::fs::read(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => AssetError::NotFound(path.to_path_buf()),
        _ => AssetError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })
}

/// Read the artifact once, fingerprint it, and build the predictor.
pub fn load_model(path: &Path) -> Result<ModelHandle, AssetError> {
    let model_error = |source| AssetError::Model {
        path: path.to_path_buf(),
        source,
    };

    let format = ModelFormat::from_path(path).map_err(model_error)?;
    let bytes = read_asset(path)?;
    let digest = model::artifact_digest(&bytes);
    let predictor = model::predictor_from_bytes(format, &bytes).map_err(model_error)?;

    tracing::info!(
        path = %path.display(),
        model = %predictor.describe(),
        digest = %digest,
        "Prediction model loaded"
    );

    Ok(ModelHandle::new(predictor, path.to_path_buf(), digest))
}

/// Shared read-only handles, injected into the HTTP layer.
#[derive(Clone)]
pub struct Assets {
    pub dataset: Arc<Dataset>,
    pub model: Arc<ModelHandle>,
    pub charts: Arc<ChartGallery>,
    pub illustration: Arc<Illustration>,
}

impl Assets {
    /// The model as the capability the prediction handler consumes.
    pub fn predictor(&self) -> Arc<dyn Predictor> {
        self.model.clone()
    }
}

/// Memoizing loader. The first successful call for an asset reads the
/// file; every later call returns the same `Arc` without touching disk.
/// Failures are not cached, but startup treats any failure as fatal.
pub struct AssetLoader {
    config: DashboardConfig,
    dataset: OnceLock<Arc<Dataset>>,
    model: OnceLock<Arc<ModelHandle>>,
    charts: OnceLock<Arc<ChartGallery>>,
    illustration: OnceLock<Arc<Illustration>>,
    // Serializes first loads so concurrent callers never read a file twice.
    load_lock: Mutex<()>,
}

impl AssetLoader {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            dataset: OnceLock::new(),
            model: OnceLock::new(),
            charts: OnceLock::new(),
            illustration: OnceLock::new(),
            load_lock: Mutex::new(()),
        }
    }

    fn memoized<T, F>(&self, cell: &OnceLock<Arc<T>>, load: F) -> Result<Arc<T>, AssetError>
    where
        F: FnOnce() -> Result<Arc<T>, AssetError>,
    {
        if let Some(value) = cell.get() {
            return Ok(value.clone());
        }
        let _guard = self.load_lock.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(value) = cell.get() {
            return Ok(value.clone());
        }
        let value = load()?;
        Ok(cell.get_or_init(|| value).clone())
    }

    pub fn dataset(&self) -> Result<Arc<Dataset>, AssetError> {
        self.memoized(&self.dataset, || {
            Dataset::load(&self.config.dataset_path).map(Arc::new)
        })
    }

    pub fn model(&self) -> Result<Arc<ModelHandle>, AssetError> {
        self.memoized(&self.model, || load_model(&self.config.model_path).map(Arc::new))
    }

    pub fn charts(&self) -> Result<Arc<ChartGallery>, AssetError> {
        self.memoized(&self.charts, || {
            ChartGallery::load(|i| self.config.chart_path(i)).map(Arc::new)
        })
    }

    pub fn illustration(&self) -> Result<Arc<Illustration>, AssetError> {
        self.memoized(&self.illustration, || {
            Illustration::load(&self.config.illustration_path).map(Arc::new)
        })
    }

    /// Eager startup load of everything the views need.
    pub fn load_all(&self) -> Result<Assets, AssetError> {
        Ok(Assets {
            dataset: self.dataset()?,
            model: self.model()?,
            charts: self.charts()?,
            illustration: self.illustration()?,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::{DATASET_FILE, ILLUSTRATION_FILE, MODEL_FILE};

    pub(crate) const DATASET_CSV: &str = "\
id;age;gender;height;weight;ap_hi;ap_lo;cholesterol;gluc;smoke;alco;active;cardio
0;50;2;168;62;110;80;1;1;0;0;1;0
1;55;1;156;85;140;90;3;1;0;0;1;1
2;51;1;165;64;130;70;3;1;0;0;0;1
";

    pub(crate) const MODEL_JSON: &str = r#"{
        "kind": "logistic_regression",
        "coefficients": [0, 0, 0, 0, 1, 0, 0, 0, 0, 0],
        "intercept": -140
    }"#;

    /// A complete asset directory in a tempdir.
    pub(crate) fn write_fixture_assets(dir: &Path) {
        std::fs::write(dir.join(DATASET_FILE), DATASET_CSV).unwrap();
        std::fs::write(dir.join(MODEL_FILE), MODEL_JSON).unwrap();
        let config = DashboardConfig::with_assets_dir(dir);
        for i in 0..5 {
            std::fs::write(config.chart_path(i), images::tests::png_bytes(8, 8)).unwrap();
        }
        std::fs::write(dir.join(ILLUSTRATION_FILE), images::tests::png_bytes(64, 48)).unwrap();
    }

    fn loader_for(dir: &Path) -> AssetLoader {
        AssetLoader::new(DashboardConfig::with_assets_dir(dir))
    }

    #[test]
    fn dataset_is_memoized_and_not_reread() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture_assets(dir.path());
        let loader = loader_for(dir.path());

        let first = loader.dataset().unwrap();
        std::fs::remove_file(dir.path().join(DATASET_FILE)).unwrap();
        let second = loader.dataset().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.len(), 3);
    }

    #[test]
    fn model_is_memoized_and_not_reread() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture_assets(dir.path());
        let loader = loader_for(dir.path());

        let first = loader.model().unwrap();
        std::fs::write(dir.path().join(MODEL_FILE), "garbage").unwrap();
        let second = loader.model().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert!(second.digest().starts_with("sha256:"));
    }

    #[test]
    fn missing_dataset_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = loader_for(dir.path()).dataset().unwrap_err();
        assert!(matches!(err, AssetError::NotFound(p) if p.ends_with(DATASET_FILE)));
    }

    #[test]
    fn corrupt_model_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture_assets(dir.path());
        std::fs::write(dir.path().join(MODEL_FILE), "{ not json").unwrap();
        let err = loader_for(dir.path()).model().unwrap_err();
        assert!(matches!(err, AssetError::Model { source: ModelError::Invalid(_), .. }));
    }

    #[test]
    fn pickle_model_is_rejected_before_reading() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = DashboardConfig::with_assets_dir(dir.path());
        config.model_path = dir.path().join("Prediction_model.pkl");
        let err = AssetLoader::new(config).model().unwrap_err();
        assert!(matches!(
            err,
            AssetError::Model { source: ModelError::UnsupportedFormat(_), .. }
        ));
    }

    #[test]
    fn load_all_shares_instances_with_getters() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture_assets(dir.path());
        let loader = loader_for(dir.path());

        let assets = loader.load_all().unwrap();
        assert!(Arc::ptr_eq(&assets.dataset, &loader.dataset().unwrap()));
        assert!(Arc::ptr_eq(&assets.model, &loader.model().unwrap()));
        assert!(Arc::ptr_eq(&assets.charts, &loader.charts().unwrap()));
        assert_eq!(assets.charts.len(), 5);
        assert_eq!(assets.illustration.width, 500);
    }

    #[test]
    fn loaded_model_predicts_through_handle() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture_assets(dir.path());
        let assets = loader_for(dir.path()).load_all().unwrap();
        let predictor = assets.predictor();
        let mut x = [45.0, 2.0, 175.0, 80.0, 130.0, 85.0, 1.0, 1.0, 1.0, 2.0];
        assert_eq!(predictor.predict(&x).unwrap(), 0);
        x[4] = 180.0;
        assert_eq!(predictor.predict(&x).unwrap(), 1);
    }
}
