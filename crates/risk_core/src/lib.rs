//! Diabetes-risk feature assembly and scoring
//!
//! Turns a snapshot of health readings and survey answers into the fixed
//! 21-element feature vector consumed by a pre-trained model, and scores it.
//!
//! Modules:
//! - `features`: Feature slots, defaults and vector assembly
//! - `snapshot`: Optional health/survey inputs
//! - `scorer`: Scoring trait and prediction output
//! - `linear`: Linear (ridge) model artifact
//! - `forest`: Random forest artifact
//! - `artifact`: Tagged model loading and hash pinning
//! - `prediction`: Prediction flow and display state
//! - `serde_canon`: Canonical JSON for hashing

pub mod artifact;
pub mod errors;
pub mod features;
pub mod forest;
pub mod linear;
pub mod prediction;
pub mod scorer;
pub mod serde_canon;
pub mod snapshot;

pub use artifact::ModelArtifact;
pub use errors::{Result, RiskCoreError};
pub use features::{age_category, assemble_features, FeatureIndex, FeatureVector, FEATURE_COUNT};
pub use forest::ForestModel;
pub use linear::LinearModel;
pub use prediction::{run_prediction, PredictionState};
pub use scorer::{Prediction, RiskClass, Scorer, DIABETES_OUTPUT};
pub use snapshot::{BiologicalSex, HealthSnapshot};

/// Crate version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Assemble and score in one call
pub fn predict<S: Scorer + ?Sized>(snapshot: &HealthSnapshot, scorer: &S) -> Result<Prediction> {
    scorer.score(&assemble_features(snapshot))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predict_is_deterministic() {
        let model = ForestModel::new(vec![forest::Tree::new(vec![
            forest::Node::split(FeatureIndex::Age.index(), 50.0, 1, 2),
            forest::Node::leaf(0.0),
            forest::Node::leaf(1.0),
        ])]);
        let snapshot = HealthSnapshot {
            age: Some(61.0),
            ..HealthSnapshot::default()
        };

        let first = predict(&snapshot, &model).unwrap();
        let second = predict(&snapshot, &model).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.class, Some(RiskClass::Prediabetes));
    }
}
