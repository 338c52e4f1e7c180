use std::sync::atomic::{AtomicUsize, Ordering};

use super::{FeatureVector, ModelError, Predictor};

enum Behavior {
    Fixed(i64),
    Rule(Box<dyn Fn(&FeatureVector) -> i64 + Send + Sync>),
    Fail(String),
}

/// Deterministic stand-in for a trained model.
///
/// Counts invocations so callers can assert the model was (or was not)
/// consulted.
pub struct StubPredictor {
    behavior: Behavior,
    calls: AtomicUsize,
}

impl StubPredictor {
    /// Always return `label`.
    pub fn fixed(label: i64) -> Self {
        Self::with(Behavior::Fixed(label))
    }

    /// Compute the label from the features.
    pub fn from_fn<F>(rule: F) -> Self
    where
        F: Fn(&FeatureVector) -> i64 + Send + Sync + 'static,
    {
        Self::with(Behavior::Rule(Box::new(rule)))
    }

    /// Fail every call with an inference error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with(Behavior::Fail(message.into()))
    }

    fn with(behavior: Behavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `predict` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Predictor for StubPredictor {
    fn predict(&self, features: &FeatureVector) -> Result<i64, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            Behavior::Fixed(label) => Ok(*label),
            Behavior::Rule(rule) => Ok(rule(features)),
            Behavior::Fail(message) => Err(ModelError::Inference(message.clone())),
        }
    }

    fn describe(&self) -> String {
        match &self.behavior {
            Behavior::Fixed(label) => format!("stub (always {label})"),
            Behavior::Rule(_) => "stub (rule)".to_string(),
            Behavior::Fail(_) => "stub (failing)".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_counts_calls() {
        let stub = StubPredictor::fixed(0);
        assert_eq!(stub.calls(), 0);
        assert_eq!(stub.predict(&[0.0; 10]).unwrap(), 0);
        assert_eq!(stub.predict(&[1.0; 10]).unwrap(), 0);
        assert_eq!(stub.calls(), 2);
    }

    #[test]
    fn rule_sees_features() {
        let stub = StubPredictor::from_fn(|x| if x[0] > 50.0 { 1 } else { 0 });
        let mut x = [0.0; 10];
        assert_eq!(stub.predict(&x).unwrap(), 0);
        x[0] = 60.0;
        assert_eq!(stub.predict(&x).unwrap(), 1);
    }

    #[test]
    fn failing_returns_inference_error() {
        let stub = StubPredictor::failing("boom");
        let err = stub.predict(&[0.0; 10]).unwrap_err();
        assert!(matches!(err, ModelError::Inference(m) if m == "boom"));
        assert_eq!(stub.calls(), 1);
    }
}
