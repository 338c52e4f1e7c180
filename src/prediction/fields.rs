//! The ten prediction fields, their domains, and typed categorical codes.

use std::fmt;

use serde::Serialize;

/// Allowed values of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    /// Inclusive integer range.
    Range { min: i64, max: i64 },
    /// Closed set of numeric codes with their meaning.
    Codes(&'static [(i64, &'static str)]),
}

impl Domain {
    pub fn contains(&self, value: i64) -> bool {
        match self {
            Domain::Range { min, max } => (*min..=*max).contains(&value),
            Domain::Codes(codes) => codes.iter().any(|(code, _)| *code == value),
        }
    }
}

const GENDER_CODES: &[(i64, &str)] = &[(1, "Female"), (2, "Male")];
const LEVEL_CODES: &[(i64, &str)] = &[(1, "Normal"), (2, "Above Normal"), (3, "Well Above Normal")];
const ALCOHOL_CODES: &[(i64, &str)] = &[(1, "No"), (2, "Yes")];
const ACTIVITY_CODES: &[(i64, &str)] = &[(1, "Low"), (2, "High")];

/// Prediction fields, declared in the column order the model was trained on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Age,
    Gender,
    Height,
    Weight,
    SystolicBp,
    DiastolicBp,
    Cholesterol,
    Glucose,
    Alcohol,
    Activity,
}

impl Field {
    /// Vector order.
    pub const ALL: [Field; 10] = [
        Field::Age,
        Field::Gender,
        Field::Height,
        Field::Weight,
        Field::SystolicBp,
        Field::DiastolicBp,
        Field::Cholesterol,
        Field::Glucose,
        Field::Alcohol,
        Field::Activity,
    ];

    /// Form/JSON key.
    pub fn key(self) -> &'static str {
        match self {
            Field::Age => "age",
            Field::Gender => "gender",
            Field::Height => "height",
            Field::Weight => "weight",
            Field::SystolicBp => "systolic_bp",
            Field::DiastolicBp => "diastolic_bp",
            Field::Cholesterol => "cholesterol",
            Field::Glucose => "glucose",
            Field::Alcohol => "alcohol",
            Field::Activity => "activity",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::Age => "Age",
            Field::Gender => "Gender",
            Field::Height => "Height (cm)",
            Field::Weight => "Weight (kg)",
            Field::SystolicBp => "Systolic Blood Pressure (mmHg)",
            Field::DiastolicBp => "Diastolic Blood Pressure (mmHg)",
            Field::Cholesterol => "Cholesterol Level",
            Field::Glucose => "Glucose Level",
            Field::Alcohol => "Alcohol Intake",
            Field::Activity => "Activity Level",
        }
    }

    /// Column holding this field in the historical dataset.
    pub fn column(self) -> &'static str {
        match self {
            Field::Age => "age",
            Field::Gender => "gender",
            Field::Height => "height",
            Field::Weight => "weight",
            Field::SystolicBp => "ap_hi",
            Field::DiastolicBp => "ap_lo",
            Field::Cholesterol => "cholesterol",
            Field::Glucose => "gluc",
            Field::Alcohol => "alco",
            Field::Activity => "active",
        }
    }

    pub fn domain(self) -> Domain {
        match self {
            Field::Age => Domain::Range { min: 0, max: 100 },
            Field::Height | Field::Weight | Field::SystolicBp | Field::DiastolicBp => {
                Domain::Range { min: 0, max: 300 }
            }
            Field::Gender => Domain::Codes(GENDER_CODES),
            Field::Cholesterol | Field::Glucose => Domain::Codes(LEVEL_CODES),
            Field::Alcohol => Domain::Codes(ALCOHOL_CODES),
            Field::Activity => Domain::Codes(ACTIVITY_CODES),
        }
    }

    /// Position in the feature vector.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A categorical field backed by a closed set of numeric codes.
pub trait Coded: Sized + Copy {
    /// Every valid code, in declaration order.
    const CODES: &'static [i64];

    fn code(self) -> i64;

    fn from_code(code: i64) -> Option<Self>;
}

macro_rules! coded_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident = $code:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
        pub enum $name {
            $($variant),+
        }

        impl Coded for $name {
            const CODES: &'static [i64] = &[$($code),+];

            fn code(self) -> i64 {
                match self {
                    $($name::$variant => $code),+
                }
            }

            fn from_code(code: i64) -> Option<Self> {
                match code {
                    $($code => Some($name::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

coded_enum!(
    /// 1 = female, 2 = male.
    Gender { Female = 1, Male = 2 }
);

coded_enum!(
    /// Shared scale for cholesterol and glucose.
    Level { Normal = 1, AboveNormal = 2, WellAboveNormal = 3 }
);

coded_enum!(AlcoholIntake { No = 1, Yes = 2 });

coded_enum!(ActivityLevel { Low = 1, High = 2 });
