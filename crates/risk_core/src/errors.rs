//! Error types for the risk core

use thiserror::Error;

use crate::serde_canon::CanonicalError;

/// Errors that can occur while assembling features or scoring them
#[derive(Error, Debug)]
pub enum RiskCoreError {
    /// Feature vector has the wrong number of elements
    #[error("Feature vector must have {expected} elements, got {actual}")]
    FeatureShape { expected: usize, actual: usize },

    /// Unknown feature name
    #[error("Unknown feature: {0}")]
    UnknownFeature(String),

    /// Model artifact failed structural validation
    #[error("Model validation failed: {0}")]
    ValidationFailed(String),

    /// Model artifact hash did not match the pinned value
    #[error("Model hash mismatch: expected {expected}, computed {actual}")]
    HashMismatch { expected: String, actual: String },

    /// Scoring failed
    #[error("Scoring failed: {0}")]
    ScoringFailed(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Canonical serialization error
    #[error("Canonical serialization error: {0}")]
    Canonical(#[from] CanonicalError),
}

/// Result type for risk core operations
pub type Result<T> = std::result::Result<T, RiskCoreError>;
