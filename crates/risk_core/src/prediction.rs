//! One-shot prediction flow and its display state

use std::fmt;
use tracing::{error, info};

use crate::features::assemble_features;
use crate::scorer::{Prediction, Scorer};
use crate::snapshot::HealthSnapshot;

/// What the prediction panel shows
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PredictionState {
    #[default]
    Waiting,
    Ready(Prediction),
    Failed(String),
}

impl PredictionState {
    pub fn is_ready(&self) -> bool {
        matches!(self, PredictionState::Ready(_))
    }
}

impl fmt::Display for PredictionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredictionState::Waiting => f.write_str("Waiting for prediction..."),
            PredictionState::Ready(prediction) => write!(f, "Prediction: {}", prediction.value),
            PredictionState::Failed(message) => write!(f, "Error: {}", message),
        }
    }
}

/// Assemble a fresh vector from `snapshot` and score it
///
/// Scorer failures are logged and folded into `PredictionState::Failed`.
pub fn run_prediction<S: Scorer + ?Sized>(snapshot: &HealthSnapshot, scorer: &S) -> PredictionState {
    let features = assemble_features(snapshot);
    match scorer.score(&features) {
        Ok(prediction) => {
            info!(
                output = %prediction.output,
                value = prediction.value,
                "prediction result"
            );
            PredictionState::Ready(prediction)
        }
        Err(e) => {
            error!(error = %e, "error running prediction");
            PredictionState::Failed(e.to_string())
        }
    }
}
