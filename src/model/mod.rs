//! Prediction model capability.
//!
//! The trained classifier is an opaque artifact produced elsewhere. This
//! module only knows how to load it and ask it for a class label given the
//! ten-feature vector; it never inspects or adjusts what the model learned.

pub mod artifact;
pub mod stub;

#[cfg(feature = "onnx-model")]
mod onnx;

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub use artifact::{JsonPredictor, ModelArtifact};
#[cfg(feature = "onnx-model")]
pub use onnx::OnnxPredictor;
pub use stub::StubPredictor;

/// Number of features the model was trained on.
pub const FEATURE_COUNT: usize = 10;

/// Fixed-order input vector: Age, Gender, Height, Weight, Systolic BP,
/// Diastolic BP, Cholesterol, Glucose, Alcohol, Activity.
pub type FeatureVector = [f64; FEATURE_COUNT];

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Unsupported model format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid model artifact: {0}")]
    Invalid(String),

    #[error("Model initialization: {0}")]
    Init(String),

    #[error("Inference failed: {0}")]
    Inference(String),
}

/// A loaded classifier. Implementations must be deterministic for a fixed
/// artifact and must not mutate observable state between calls.
pub trait Predictor: Send + Sync {
    /// Classify one feature vector, returning the raw class label.
    fn predict(&self, features: &FeatureVector) -> Result<i64, ModelError>;

    /// Short human-readable description (model family, size).
    fn describe(&self) -> String;
}

/// Allow `Box<dyn Predictor>` to be used wherever a `Predictor` is expected.
impl Predictor for Box<dyn Predictor> {
    fn predict(&self, features: &FeatureVector) -> Result<i64, ModelError> {
        (**self).predict(features)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Artifact encodings recognised by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFormat {
    Json,
    Onnx,
}

impl ModelFormat {
    pub fn from_path(path: &Path) -> Result<Self, ModelError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "json" => Ok(ModelFormat::Json),
            "onnx" => Ok(ModelFormat::Onnx),
            "" => Err(ModelError::UnsupportedFormat(format!(
                "{} has no file extension",
                path.display()
            ))),
            other => Err(ModelError::UnsupportedFormat(format!(
                ".{other} (expected .json or .onnx)"
            ))),
        }
    }
}

/// Build a predictor from artifact bytes already read from disk.
pub fn predictor_from_bytes(
    format: ModelFormat,
    bytes: &[u8],
) -> Result<Box<dyn Predictor>, ModelError> {
    match format {
        ModelFormat::Json => Ok(Box::new(JsonPredictor::from_slice(bytes)?)),
        ModelFormat::Onnx => onnx_from_bytes(bytes),
    }
}

#[cfg(feature = "onnx-model")]
fn onnx_from_bytes(bytes: &[u8]) -> Result<Box<dyn Predictor>, ModelError> {
    Ok(Box::new(OnnxPredictor::from_memory(bytes)?))
}

#[cfg(not(feature = "onnx-model"))]
fn onnx_from_bytes(_bytes: &[u8]) -> Result<Box<dyn Predictor>, ModelError> {
    Err(ModelError::UnsupportedFormat(
        "ONNX artifacts require the `onnx-model` feature".into(),
    ))
}

/// A loaded model plus the provenance reported by the health endpoint.
pub struct ModelHandle {
    predictor: Box<dyn Predictor>,
    source: PathBuf,
    digest: String,
}

impl ModelHandle {
    pub fn new(predictor: Box<dyn Predictor>, source: PathBuf, digest: String) -> Self {
        Self {
            predictor,
            source,
            digest,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// `sha256:<hex>` of the artifact bytes.
    pub fn digest(&self) -> &str {
        &self.digest
    }
}

impl fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelHandle")
            .field("model", &self.predictor.describe())
            .field("source", &self.source)
            .field("digest", &self.digest)
            .finish()
    }
}

impl Predictor for ModelHandle {
    fn predict(&self, features: &FeatureVector) -> Result<i64, ModelError> {
        self.predictor.predict(features)
    }

    fn describe(&self) -> String {
        self.predictor.describe()
    }
}

/// SHA-256 of an artifact, formatted the way the health endpoint reports it.
pub fn artifact_digest(bytes: &[u8]) -> String {
    use sha2::{Digest, Sha256};

    format!("sha256:{:x}", Sha256::digest(bytes))
}
