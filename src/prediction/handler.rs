use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;

use super::request::{build_request, PredictionFields, PredictionRequest};
use super::{PredictionError, SubmitError};
use crate::model::{FeatureVector, Predictor, FEATURE_COUNT};

/// Binary, human-readable result of a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    NoRiskDetected,
    RiskDetected,
}

impl Outcome {
    /// Mapping law: 0 → no risk, 1 → risk, anything else is surfaced as
    /// an unexpected model output.
    pub fn from_label(label: i64) -> Result<Self, PredictionError> {
        match label {
            0 => Ok(Outcome::NoRiskDetected),
            1 => Ok(Outcome::RiskDetected),
            other => Err(PredictionError::UnexpectedModelOutput { label: other }),
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Outcome::NoRiskDetected => "No possibility of heart attack detected.",
            Outcome::RiskDetected => {
                "Future heart attack detected. Please consult a doctor for further advice."
            }
        }
    }

    pub fn is_risk(self) -> bool {
        matches!(self, Outcome::RiskDetected)
    }
}

/// Result of one Predict action, with the diagnostics shown under it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub outcome: Outcome,
    pub message: &'static str,
    /// Always `[1, 10]`: one row, ten features.
    pub input_shape: [usize; 2],
    pub features: FeatureVector,
    pub label: i64,
}

/// Validates submissions and forwards them to the shared model.
#[derive(Clone)]
pub struct PredictionHandler {
    model: Arc<dyn Predictor>,
}

impl PredictionHandler {
    pub fn new(model: Arc<dyn Predictor>) -> Self {
        Self { model }
    }

    /// Run the model on an already validated request.
    pub fn predict(&self, request: &PredictionRequest) -> Result<Prediction, PredictionError> {
        let features = request.features();
        let started = Instant::now();
        let label = self.model.predict(&features)?;
        let outcome = Outcome::from_label(label).inspect_err(|_| {
            tracing::warn!(label, "Model returned a label outside the known classes");
        })?;

        tracing::debug!(
            outcome = ?outcome,
            elapsed_us = started.elapsed().as_micros() as u64,
            "Prediction complete"
        );

        Ok(Prediction {
            outcome,
            message: outcome.message(),
            input_shape: [1, FEATURE_COUNT],
            features,
            label,
        })
    }

    /// Validate then predict. The model is never consulted for invalid input.
    pub fn submit(&self, fields: &PredictionFields) -> Result<Prediction, SubmitError> {
        let request = build_request(fields).inspect_err(|e| {
            tracing::debug!(field = e.field.key(), "Prediction input rejected");
        })?;
        Ok(self.predict(&request)?)
    }
}
