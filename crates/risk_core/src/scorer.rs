//! Scoring interface over pre-trained model artifacts
//!
//! A scorer is opaque: it receives the 21-element vector and returns one
//! numeric output. The diabetes models emit the `Diabetes_012` class.

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::features::FeatureVector;

/// Output column produced by the bundled diabetes models
pub const DIABETES_OUTPUT: &str = "Diabetes_012";

/// Diabetes class encoded by `Diabetes_012`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskClass {
    NoDiabetes = 0,
    Prediabetes = 1,
    Diabetes = 2,
}

impl RiskClass {
    /// Map a model output onto a class when it is exactly 0, 1 or 2
    pub fn from_value(value: f64) -> Option<Self> {
        if value == 0.0 {
            Some(RiskClass::NoDiabetes)
        } else if value == 1.0 {
            Some(RiskClass::Prediabetes)
        } else if value == 2.0 {
            Some(RiskClass::Diabetes)
        } else {
            None
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            RiskClass::NoDiabetes => "no diabetes",
            RiskClass::Prediabetes => "prediabetes",
            RiskClass::Diabetes => "diabetes",
        }
    }
}

/// Result of scoring one feature vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Name of the model output column
    pub output: String,
    /// Raw output value
    pub value: f64,
    /// Class interpretation of `value`, if it is one
    pub class: Option<RiskClass>,
}

impl Prediction {
    pub fn new(output: impl Into<String>, value: f64) -> Self {
        Self {
            output: output.into(),
            value,
            class: RiskClass::from_value(value),
        }
    }
}

/// A pre-trained model that turns a feature vector into a prediction
pub trait Scorer: Send + Sync {
    /// Name of the output column
    fn output_name(&self) -> &str;

    fn score(&self, features: &FeatureVector) -> Result<Prediction>;
}

impl<S: Scorer + ?Sized> Scorer for Box<S> {
    fn output_name(&self) -> &str {
        (**self).output_name()
    }

    fn score(&self, features: &FeatureVector) -> Result<Prediction> {
        (**self).score(features)
    }
}
