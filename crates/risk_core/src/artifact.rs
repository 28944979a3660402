//! Model artifact loading and hash pinning
//!
//! Artifacts are tagged JSON documents:
//!
//! ```json
//! { "kind": "linear", "classes": [0, 1, 2], "weights": [[...], ...] }
//! { "kind": "forest", "trees": [{ "nodes": [...] }] }
//! ```
//!
//! The Blake3 hash is computed over the canonical JSON form so that
//! reformatting a file does not change its identity.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::errors::{Result, RiskCoreError};
use crate::features::FeatureVector;
use crate::forest::ForestModel;
use crate::linear::LinearModel;
use crate::scorer::{Prediction, Scorer};
use crate::serde_canon::{hash_canonical_hex, to_canonical_json};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    Linear(LinearModel),
    Forest(ForestModel),
}

impl ModelArtifact {
    pub fn kind(&self) -> &'static str {
        match self {
            ModelArtifact::Linear(_) => "linear",
            ModelArtifact::Forest(_) => "forest",
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            ModelArtifact::Linear(model) => model.validate(),
            ModelArtifact::Forest(model) => model.validate(),
        }
    }

    /// Parse and validate an artifact from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        let artifact: ModelArtifact = serde_json::from_str(json)?;
        artifact.validate()?;
        Ok(artifact)
    }

    /// Load and validate an artifact from disk
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let artifact = Self::from_json(&json)?;
        debug!(path = %path.display(), kind = artifact.kind(), "loaded model artifact");
        Ok(artifact)
    }

    /// Write the canonical JSON form
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, to_canonical_json(self)?)?;
        Ok(())
    }

    pub fn hash_hex(&self) -> Result<String> {
        Ok(hash_canonical_hex(self)?)
    }

    /// Fail unless the artifact hashes to `expected` (hex, any case)
    pub fn verify_hash(&self, expected: &str) -> Result<()> {
        let actual = self.hash_hex()?;
        if !actual.eq_ignore_ascii_case(expected.trim()) {
            return Err(RiskCoreError::HashMismatch {
                expected: expected.trim().to_string(),
                actual,
            });
        }
        info!(hash = %actual, "model hash verified");
        Ok(())
    }
}

impl Scorer for ModelArtifact {
    fn output_name(&self) -> &str {
        match self {
            ModelArtifact::Linear(model) => model.output_name(),
            ModelArtifact::Forest(model) => model.output_name(),
        }
    }

    fn score(&self, features: &FeatureVector) -> Result<Prediction> {
        match self {
            ModelArtifact::Linear(model) => model.score(features),
            ModelArtifact::Forest(model) => model.score(features),
        }
    }
}
