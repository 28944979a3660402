//! Linear (ridge) model artifact
//!
//! Weights are stored the way a first-order polynomial design matrix lays
//! them out: row 0 multiplies the constant 1, rows 1..=21 multiply the
//! features in vector order. Each column scores one class.

use serde::{Deserialize, Serialize};

use crate::errors::{Result, RiskCoreError};
use crate::features::{FeatureVector, FEATURE_COUNT};
use crate::scorer::{Prediction, Scorer, DIABETES_OUTPUT};

/// Rows expected in the weight matrix: bias row plus one per feature
pub const LINEAR_ROWS: usize = FEATURE_COUNT + 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    /// Output column name
    #[serde(default = "default_output")]
    pub output: String,
    /// Class label for each weight column
    pub classes: Vec<f64>,
    /// `LINEAR_ROWS` rows of `classes.len()` weights
    pub weights: Vec<Vec<f64>>,
}

fn default_output() -> String {
    DIABETES_OUTPUT.to_string()
}

impl LinearModel {
    pub fn new(classes: Vec<f64>, weights: Vec<Vec<f64>>) -> Self {
        Self {
            output: default_output(),
            classes,
            weights,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.classes.is_empty() {
            return Err(RiskCoreError::ValidationFailed(
                "Linear model has no output columns".into(),
            ));
        }

        if self.weights.len() != LINEAR_ROWS {
            return Err(RiskCoreError::ValidationFailed(format!(
                "Linear model needs {} weight rows, found {}",
                LINEAR_ROWS,
                self.weights.len()
            )));
        }

        for (row_idx, row) in self.weights.iter().enumerate() {
            if row.len() != self.classes.len() {
                return Err(RiskCoreError::ValidationFailed(format!(
                    "Weight row {} has {} columns, expected {}",
                    row_idx,
                    row.len(),
                    self.classes.len()
                )));
            }
            if row.iter().any(|w| !w.is_finite()) {
                return Err(RiskCoreError::ValidationFailed(format!(
                    "Weight row {} contains a non-finite value",
                    row_idx
                )));
            }
        }

        Ok(())
    }

    /// Per-column scores for `[1, features...]`
    pub fn column_scores(&self, features: &FeatureVector) -> Result<Vec<f64>> {
        self.validate()?;
        let mut scores = self.weights[0].clone();
        for (value, row) in features.as_slice().iter().zip(&self.weights[1..]) {
            for (score, weight) in scores.iter_mut().zip(row) {
                *score += value * weight;
            }
        }
        Ok(scores)
    }
}

impl Scorer for LinearModel {
    fn output_name(&self) -> &str {
        &self.output
    }

    fn score(&self, features: &FeatureVector) -> Result<Prediction> {
        let scores = self.column_scores(features)?;

        let value = if scores.len() == 1 {
            scores[0]
        } else {
            // first column wins ties
            let mut best = 0;
            for (idx, score) in scores.iter().enumerate().skip(1) {
                if *score > scores[best] {
                    best = idx;
                }
            }
            self.classes[best]
        };

        if !value.is_finite() {
            return Err(RiskCoreError::ScoringFailed(
                "Linear model produced a non-finite output".into(),
            ));
        }

        Ok(Prediction::new(self.output.clone(), value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureIndex;
    use crate::scorer::RiskClass;

    /// Three-class model that only looks at BMI and HighBP
    fn bmi_model() -> LinearModel {
        let mut weights = vec![vec![0.0; 3]; LINEAR_ROWS];
        weights[0] = vec![1.0, 0.0, -1.0];
        weights[1 + FeatureIndex::Bmi.index()] = vec![0.0, 0.02, 0.04];
        weights[1 + FeatureIndex::HighBp.index()] = vec![0.0, 0.5, 0.5];
        LinearModel::new(vec![0.0, 1.0, 2.0], weights)
    }

    fn with(bmi: f64, high_bp: f64) -> FeatureVector {
        let mut values: Vec<f64> = FeatureVector::defaults().into();
        values[FeatureIndex::Bmi.index()] = bmi;
        values[FeatureIndex::HighBp.index()] = high_bp;
        FeatureVector::try_from(values).unwrap()
    }

    #[test]
    fn test_validate_ok() {
        assert!(bmi_model().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_wrong_row_count() {
        let model = LinearModel::new(vec![0.0], vec![vec![0.0]; FEATURE_COUNT]);
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_ragged_rows() {
        let mut model = bmi_model();
        model.weights[4] = vec![0.0, 1.0];
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_finite() {
        let mut model = bmi_model();
        model.weights[2][1] = f64::NAN;
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_column_scores_include_bias() {
        let scores = bmi_model().column_scores(&with(25.0, 0.0)).unwrap();
        assert!((scores[0] - 1.0).abs() < 1e-12);
        assert!((scores[1] - 0.5).abs() < 1e-12);
        assert!((scores[2] - 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_argmax_class() {
        let model = bmi_model();
        // 1.0 / 0.5 / 0.0
        assert_eq!(model.score(&with(25.0, 0.0)).unwrap().value, 0.0);
        // 1.0 / 1.3 / 1.1
        assert_eq!(model.score(&with(40.0, 1.0)).unwrap().value, 1.0);
        // 1.0 / 1.7 / 1.9
        let prediction = model.score(&with(60.0, 1.0)).unwrap();
        assert_eq!(prediction.value, 2.0);
        assert_eq!(prediction.class, Some(RiskClass::Diabetes));
    }

    #[test]
    fn test_ties_pick_first_column() {
        let weights = vec![vec![0.5, 0.5]; LINEAR_ROWS]
            .into_iter()
            .enumerate()
            .map(|(i, row)| if i == 0 { row } else { vec![0.0, 0.0] })
            .collect();
        let model = LinearModel::new(vec![0.0, 1.0], weights);
        assert_eq!(model.score(&FeatureVector::defaults()).unwrap().value, 0.0);
    }

    #[test]
    fn test_single_column_is_regression() {
        let mut weights = vec![vec![0.0]; LINEAR_ROWS];
        weights[0] = vec![0.25];
        weights[1 + FeatureIndex::Age.index()] = vec![0.01];
        let model = LinearModel::new(vec![0.0], weights);

        let prediction = model.score(&FeatureVector::defaults()).unwrap();
        assert!((prediction.value - 0.46).abs() < 1e-12);
        assert_eq!(prediction.class, None);
    }

    #[test]
    fn test_malformed_model_errors_instead_of_panicking() {
        let empty = LinearModel::new(vec![0.0], vec![]);
        assert!(matches!(
            empty.column_scores(&FeatureVector::defaults()),
            Err(RiskCoreError::ValidationFailed(_))
        ));
        assert!(empty.score(&FeatureVector::defaults()).is_err());

        let no_classes = LinearModel::new(vec![], vec![vec![]; LINEAR_ROWS]);
        assert!(no_classes.column_scores(&FeatureVector::defaults()).is_err());
    }
}
