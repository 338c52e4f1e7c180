//! Prediction request handling: validate ten fields, ask the model, map
//! its label to an outcome.
//!
//! Flow per Predict action (nothing is carried between invocations):
//! `Idle -> Validating -> (Invalid | Predicting) -> Done`.

pub mod fields;
pub mod handler;
pub mod request;

use thiserror::Error;

use crate::model::ModelError;

pub use fields::{Domain, Field};
pub use handler::{Outcome, Prediction, PredictionHandler};
pub use request::{build_request, PredictionFields, PredictionRequest, RawValue, Rejection};

/// A submitted field is outside its declared domain.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: Field,
    pub reason: Rejection,
}

#[derive(Error, Debug)]
pub enum PredictionError {
    /// The model answered with a label outside the known classes.
    #[error("Model returned unexpected class label {label}")]
    UnexpectedModelOutput { label: i64 },

    #[error("Model failure: {0}")]
    Model(#[from] ModelError),
}

/// Either stage of a submission can fail.
#[derive(Error, Debug)]
pub enum SubmitError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Prediction(#[from] PredictionError),
}
