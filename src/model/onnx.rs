use std::sync::Mutex;

use ort::session::Session;

use super::{FeatureVector, ModelError, Predictor, FEATURE_COUNT};

/// Classifier exported to ONNX (e.g. via skl2onnx) and run with ONNX Runtime.
///
/// Expects a single float input of shape `[1, 10]` and an int64 label
/// tensor as the first output, which is what scikit-learn classifiers
/// export to by default.
///
/// Uses interior mutability (Mutex) because `ort::Session::run` requires
/// `&mut self` while `Predictor` exposes `&self`.
pub struct OnnxPredictor {
    session: Mutex<Session>,
    input_name: String,
}

impl OnnxPredictor {
    pub fn from_memory(bytes: &[u8]) -> Result<Self, ModelError> {
        let session = Session::builder()
            .map_err(|e: ort::Error| ModelError::Init(e.to_string()))?
            .with_intra_threads(1)
            .map_err(|e: ort::Error| ModelError::Init(e.to_string()))?
            .commit_from_memory(bytes)
            .map_err(|e: ort::Error| ModelError::Init(format!("ONNX load failed: {e}")))?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .ok_or_else(|| ModelError::Init("ONNX model declares no inputs".into()))?;

        tracing::info!(input = %input_name, "ONNX predictor loaded");

        Ok(Self {
            session: Mutex::new(session),
            input_name,
        })
    }
}

impl Predictor for OnnxPredictor {
    fn predict(&self, features: &FeatureVector) -> Result<i64, ModelError> {
        use ort::value::TensorRef;

        let row: Vec<f32> = features.iter().map(|&x| x as f32).collect();
        let input = ndarray::Array2::from_shape_vec((1, FEATURE_COUNT), row)
            .map_err(|e| ModelError::Inference(e.to_string()))?;
        let tensor = TensorRef::from_array_view(&input)
            .map_err(|e| ModelError::Inference(e.to_string()))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| ModelError::Inference("Session lock poisoned".to_string()))?;

        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => tensor])
            .map_err(|e| ModelError::Inference(format!("ONNX inference failed: {e}")))?;

        let (_shape, labels) = outputs[0]
            .try_extract_tensor::<i64>()
            .map_err(|e| ModelError::Inference(format!("Output extraction: {e}")))?;

        labels
            .first()
            .copied()
            .ok_or_else(|| ModelError::Inference("Model returned an empty label tensor".into()))
    }

    fn describe(&self) -> String {
        format!("onnx ({})", self.input_name)
    }
}
