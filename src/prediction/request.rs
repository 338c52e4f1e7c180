//! Raw form input → validated, fixed-order prediction request.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::fields::{ActivityLevel, AlcoholIntake, Coded, Domain, Field, Gender, Level};
use super::ValidationError;
use crate::model::FeatureVector;

/// A submitted value before validation. HTML forms send text, the JSON
/// API sends numbers; both are accepted and checked the same way.
/// Any other JSON value (booleans, arrays, objects) lands in `Other` and
/// is rejected by validation rather than by the body parser.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RawValue {
    Int(i64),
    Float(f64),
    Text(String),
    Other(serde_json::Value),
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Int(v) => write!(f, "{v}"),
            RawValue::Float(v) => write!(f, "{v}"),
            RawValue::Text(v) => f.write_str(v),
            RawValue::Other(v) => write!(f, "{v}"),
        }
    }
}

impl From<i64> for RawValue {
    fn from(v: i64) -> Self {
        RawValue::Int(v)
    }
}

impl From<&str> for RawValue {
    fn from(v: &str) -> Self {
        RawValue::Text(v.to_string())
    }
}

/// Why a field was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    Missing,
    NotAnInteger(String),
    OutOfRange { value: i64, min: i64, max: i64 },
    UnknownCode { value: i64, allowed: Vec<i64> },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Missing => f.write_str("a value is required"),
            Rejection::NotAnInteger(raw) => write!(f, "'{raw}' is not a whole number"),
            Rejection::OutOfRange { value, min, max } => {
                write!(f, "{value} is outside {min}..={max}")
            }
            Rejection::UnknownCode { value, allowed } => {
                let allowed: Vec<String> = allowed.iter().map(|c| c.to_string()).collect();
                write!(f, "{value} is not one of {}", allowed.join(", "))
            }
        }
    }
}

/// The ten raw inputs as submitted.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PredictionFields {
    #[serde(default)]
    pub age: Option<RawValue>,
    #[serde(default)]
    pub gender: Option<RawValue>,
    #[serde(default)]
    pub height: Option<RawValue>,
    #[serde(default)]
    pub weight: Option<RawValue>,
    #[serde(default)]
    pub systolic_bp: Option<RawValue>,
    #[serde(default)]
    pub diastolic_bp: Option<RawValue>,
    #[serde(default)]
    pub cholesterol: Option<RawValue>,
    #[serde(default)]
    pub glucose: Option<RawValue>,
    #[serde(default)]
    pub alcohol: Option<RawValue>,
    #[serde(default)]
    pub activity: Option<RawValue>,
}

impl PredictionFields {
    /// All ten fields as integers, in vector order.
    pub fn from_values(values: [i64; 10]) -> Self {
        let mut fields = Self::default();
        for (field, value) in Field::ALL.into_iter().zip(values) {
            fields.set(field, RawValue::Int(value));
        }
        fields
    }

    pub fn get(&self, field: Field) -> Option<&RawValue> {
        match field {
            Field::Age => self.age.as_ref(),
            Field::Gender => self.gender.as_ref(),
            Field::Height => self.height.as_ref(),
            Field::Weight => self.weight.as_ref(),
            Field::SystolicBp => self.systolic_bp.as_ref(),
            Field::DiastolicBp => self.diastolic_bp.as_ref(),
            Field::Cholesterol => self.cholesterol.as_ref(),
            Field::Glucose => self.glucose.as_ref(),
            Field::Alcohol => self.alcohol.as_ref(),
            Field::Activity => self.activity.as_ref(),
        }
    }

    pub fn set(&mut self, field: Field, value: RawValue) {
        let slot = match field {
            Field::Age => &mut self.age,
            Field::Gender => &mut self.gender,
            Field::Height => &mut self.height,
            Field::Weight => &mut self.weight,
            Field::SystolicBp => &mut self.systolic_bp,
            Field::DiastolicBp => &mut self.diastolic_bp,
            Field::Cholesterol => &mut self.cholesterol,
            Field::Glucose => &mut self.glucose,
            Field::Alcohol => &mut self.alcohol,
            Field::Activity => &mut self.activity,
        };
        *slot = Some(value);
    }

    /// Text used to prefill the form after a submission.
    pub fn display_value(&self, field: Field) -> Option<String> {
        self.get(field).map(|v| v.to_string())
    }
}

/// A validated request. Only constructible through [`build_request`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRequest {
    age: u16,
    gender: Gender,
    height: u16,
    weight: u16,
    systolic_bp: u16,
    diastolic_bp: u16,
    cholesterol: Level,
    glucose: Level,
    alcohol: AlcoholIntake,
    activity: ActivityLevel,
}

impl PredictionRequest {
    /// Fixed-order vector fed to the model. Categorical fields are passed
    /// as their raw codes; no scaling or encoding is applied.
    pub fn features(&self) -> FeatureVector {
        [
            f64::from(self.age),
            self.gender.code() as f64,
            f64::from(self.height),
            f64::from(self.weight),
            f64::from(self.systolic_bp),
            f64::from(self.diastolic_bp),
            self.cholesterol.code() as f64,
            self.glucose.code() as f64,
            self.alcohol.code() as f64,
            self.activity.code() as f64,
        ]
    }
}

/// Whole numbers written with a zero fraction (`45.0`) count as integers.
fn integral(value: f64) -> Option<i64> {
    (value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15).then_some(value as i64)
}

fn parse_integer(raw: &RawValue) -> Result<i64, Rejection> {
    match raw {
        RawValue::Int(v) => Ok(*v),
        RawValue::Float(v) => integral(*v).ok_or_else(|| Rejection::NotAnInteger(v.to_string())),
        RawValue::Text(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Err(Rejection::Missing);
            }
            trimmed
                .parse::<i64>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().and_then(integral))
                .ok_or_else(|| Rejection::NotAnInteger(text.clone()))
        }
        RawValue::Other(v) => Err(Rejection::NotAnInteger(v.to_string())),
    }
}

fn read_integer(fields: &PredictionFields, field: Field) -> Result<i64, ValidationError> {
    let raw = fields.get(field).ok_or(ValidationError {
        field,
        reason: Rejection::Missing,
    })?;
    parse_integer(raw).map_err(|reason| ValidationError { field, reason })
}

fn check_range(fields: &PredictionFields, field: Field) -> Result<u16, ValidationError> {
    let value = read_integer(fields, field)?;
    let domain = field.domain();
    if domain.contains(value) {
        if let Ok(value) = u16::try_from(value) {
            return Ok(value);
        }
    }
    let reason = match domain {
        Domain::Range { min, max } => Rejection::OutOfRange { value, min, max },
        Domain::Codes(codes) => Rejection::UnknownCode {
            value,
            allowed: codes.iter().map(|(c, _)| *c).collect(),
        },
    };
    Err(ValidationError { field, reason })
}

fn check_coded<T: Coded>(fields: &PredictionFields, field: Field) -> Result<T, ValidationError> {
    let value = read_integer(fields, field)?;
    T::from_code(value).ok_or_else(|| ValidationError {
        field,
        reason: Rejection::UnknownCode {
            value,
            allowed: T::CODES.to_vec(),
        },
    })
}

/// Validate every field against its domain, in vector order. The first
/// offending field is reported; nothing is clamped or defaulted.
pub fn build_request(fields: &PredictionFields) -> Result<PredictionRequest, ValidationError> {
    Ok(PredictionRequest {
        age: check_range(fields, Field::Age)?,
        gender: check_coded(fields, Field::Gender)?,
        height: check_range(fields, Field::Height)?,
        weight: check_range(fields, Field::Weight)?,
        systolic_bp: check_range(fields, Field::SystolicBp)?,
        diastolic_bp: check_range(fields, Field::DiastolicBp)?,
        cholesterol: check_coded(fields, Field::Cholesterol)?,
        glucose: check_coded(fields, Field::Glucose)?,
        alcohol: check_coded(fields, Field::Alcohol)?,
        activity: check_coded(fields, Field::Activity)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: [i64; 10] = [45, 2, 175, 80, 130, 85, 1, 1, 1, 2];

    #[test]
    fn sample_assembles_in_training_order() {
        let request = build_request(&PredictionFields::from_values(SAMPLE)).unwrap();
        assert_eq!(
            request.features(),
            [45.0, 2.0, 175.0, 80.0, 130.0, 85.0, 1.0, 1.0, 1.0, 2.0]
        );
        assert_eq!(request.gender, Gender::Male);
        assert_eq!(request.activity, ActivityLevel::High);
    }

    #[test]
    fn domain_edges_are_accepted() {
        let low = [0, 1, 0, 0, 0, 0, 1, 1, 1, 1];
        let high = [100, 2, 300, 300, 300, 300, 3, 3, 2, 2];
        for values in [low, high] {
            let request = build_request(&PredictionFields::from_values(values)).unwrap();
            let expected: Vec<f64> = values.iter().map(|v| *v as f64).collect();
            assert_eq!(request.features().to_vec(), expected);
        }
    }

    #[test]
    fn every_distinct_vector_position_is_preserved() {
        // Each position gets a value that is legal only there or unique enough
        // to detect a swap.
        let values = [99, 1, 201, 202, 203, 204, 3, 2, 2, 1];
        let request = build_request(&PredictionFields::from_values(values)).unwrap();
        let features = request.features();
        for field in Field::ALL {
            assert_eq!(features[field.index()], values[field.index()] as f64, "{field}");
        }
    }

    #[test]
    fn age_out_of_range_names_age() {
        for bad in [-1, 101, 150] {
            let mut values = SAMPLE;
            values[0] = bad;
            let err = build_request(&PredictionFields::from_values(values)).unwrap_err();
            assert_eq!(err.field, Field::Age);
            assert_eq!(
                err.reason,
                Rejection::OutOfRange {
                    value: bad,
                    min: 0,
                    max: 100
                }
            );
        }
    }

    #[test]
    fn gender_three_text_is_unknown_code() {
        let mut fields = PredictionFields::from_values(SAMPLE);
        fields.set(Field::Gender, RawValue::from("3"));
        let err = build_request(&fields).unwrap_err();
        assert_eq!(err.field, Field::Gender);
        assert_eq!(
            err.reason,
            Rejection::UnknownCode {
                value: 3,
                allowed: vec![1, 2]
            }
        );
        assert!(err.to_string().contains("Gender"));
    }

    #[test]
    fn each_categorical_rejects_outside_set() {
        for (field, bad) in [
            (Field::Cholesterol, 4),
            (Field::Glucose, 0),
            (Field::Alcohol, 3),
            (Field::Activity, -2),
        ] {
            let mut values = SAMPLE;
            values[field.index()] = bad;
            let err = build_request(&PredictionFields::from_values(values)).unwrap_err();
            assert_eq!(err.field, field);
            assert!(matches!(err.reason, Rejection::UnknownCode { .. }));
        }
    }

    #[test]
    fn text_values_are_parsed_not_coerced() {
        let mut fields = PredictionFields::from_values(SAMPLE);
        fields.set(Field::Height, RawValue::from(" 180 "));
        assert_eq!(build_request(&fields).unwrap().features()[2], 180.0);

        fields.set(Field::Height, RawValue::from("180cm"));
        let err = build_request(&fields).unwrap_err();
        assert_eq!(err.field, Field::Height);
        assert!(matches!(err.reason, Rejection::NotAnInteger(_)));
    }

    #[test]
    fn fractional_numbers_are_rejected() {
        let mut fields = PredictionFields::from_values(SAMPLE);
        fields.set(Field::Weight, RawValue::Float(80.5));
        let err = build_request(&fields).unwrap_err();
        assert_eq!(err.field, Field::Weight);

        fields.set(Field::Weight, RawValue::Float(80.0));
        assert_eq!(build_request(&fields).unwrap().features()[3], 80.0);
    }

    #[test]
    fn integral_text_matches_integral_json() {
        let mut fields = PredictionFields::from_values(SAMPLE);
        fields.set(Field::Age, RawValue::from("45.0"));
        fields.set(Field::Weight, RawValue::Float(80.0));
        let features = build_request(&fields).unwrap().features();
        assert_eq!(features[0], 45.0);
        assert_eq!(features[3], 80.0);

        fields.set(Field::Age, RawValue::from("45.5"));
        let err = build_request(&fields).unwrap_err();
        assert_eq!(err.field, Field::Age);
        assert_eq!(err.reason, Rejection::NotAnInteger("45.5".into()));
    }

    #[test]
    fn blank_text_is_missing() {
        for blank in ["", "   "] {
            let mut fields = PredictionFields::from_values(SAMPLE);
            fields.set(Field::Height, RawValue::from(blank));
            let err = build_request(&fields).unwrap_err();
            assert_eq!(err.field, Field::Height);
            assert_eq!(err.reason, Rejection::Missing);
        }
    }

    #[test]
    fn non_scalar_json_is_a_field_error() {
        let json = r#"{
            "age": true, "gender": 2, "height": 175, "weight": 80,
            "systolic_bp": 130, "diastolic_bp": 85, "cholesterol": 1,
            "glucose": 1, "alcohol": 1, "activity": 2
        }"#;
        let fields: PredictionFields = serde_json::from_str(json).unwrap();
        assert_eq!(fields.age, Some(RawValue::Other(serde_json::Value::Bool(true))));
        let err = build_request(&fields).unwrap_err();
        assert_eq!(err.field, Field::Age);
        assert_eq!(err.reason, Rejection::NotAnInteger("true".into()));

        let mut fields = PredictionFields::from_values(SAMPLE);
        fields.set(Field::Glucose, RawValue::Other(serde_json::json!([1])));
        assert_eq!(build_request(&fields).unwrap_err().field, Field::Glucose);
    }

    #[test]
    fn categorical_rejection_lists_every_code() {
        for (field, allowed) in [
            (Field::Cholesterol, vec![1, 2, 3]),
            (Field::Glucose, vec![1, 2, 3]),
            (Field::Alcohol, vec![1, 2]),
            (Field::Activity, vec![1, 2]),
        ] {
            let mut values = SAMPLE;
            values[field.index()] = 7;
            let err = build_request(&PredictionFields::from_values(values)).unwrap_err();
            assert_eq!(err.reason, Rejection::UnknownCode { value: 7, allowed }, "{field}");
        }
    }

    #[test]
    fn missing_field_is_reported() {
        let mut fields = PredictionFields::from_values(SAMPLE);
        fields.diastolic_bp = None;
        let err = build_request(&fields).unwrap_err();
        assert_eq!(err.field, Field::DiastolicBp);
        assert_eq!(err.reason, Rejection::Missing);
    }

    #[test]
    fn first_offending_field_in_vector_order_wins() {
        let mut values = SAMPLE;
        values[0] = 500;
        values[9] = 9;
        let err = build_request(&PredictionFields::from_values(values)).unwrap_err();
        assert_eq!(err.field, Field::Age);
    }

    #[test]
    fn json_accepts_numbers_and_strings() {
        let json = r#"{
            "age": 45, "gender": "2", "height": 175, "weight": 80.0,
            "systolic_bp": 130, "diastolic_bp": 85, "cholesterol": 1,
            "glucose": 1, "alcohol": 1, "activity": 2
        }"#;
        let fields: PredictionFields = serde_json::from_str(json).unwrap();
        let request = build_request(&fields).unwrap();
        assert_eq!(request.features()[1], 2.0);
        assert_eq!(request.features()[3], 80.0);
    }

    #[test]
    fn display_value_echoes_input() {
        let mut fields = PredictionFields::default();
        fields.set(Field::Age, RawValue::from("abc"));
        assert_eq!(fields.display_value(Field::Age).as_deref(), Some("abc"));
        assert_eq!(fields.display_value(Field::Gender), None);
    }
}
