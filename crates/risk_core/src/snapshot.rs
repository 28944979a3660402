//! Snapshot of health and survey answers feeding the feature vector

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::errors::Result;

/// Biological sex as reported by the health provider or the survey
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BiologicalSex {
    Male,
    Female,
    Other,
    NotSet,
}

impl BiologicalSex {
    /// Parse a display label; anything unrecognized is `NotSet`
    pub fn from_label(label: &str) -> Self {
        match label {
            "Male" => BiologicalSex::Male,
            "Female" => BiologicalSex::Female,
            "Other" => BiologicalSex::Other,
            _ => BiologicalSex::NotSet,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BiologicalSex::Male => "Male",
            BiologicalSex::Female => "Female",
            BiologicalSex::Other => "Other",
            BiologicalSex::NotSet => "Not Set",
        }
    }
}

impl From<String> for BiologicalSex {
    fn from(label: String) -> Self {
        BiologicalSex::from_label(&label)
    }
}

impl From<BiologicalSex> for String {
    fn from(sex: BiologicalSex) -> Self {
        sex.label().to_string()
    }
}

impl std::fmt::Display for BiologicalSex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Current in-memory values for every model input
///
/// Every field is optional. Missing fields fall back to the feature default
/// during assembly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthSnapshot {
    pub high_bp: Option<f64>,
    pub high_chol: Option<f64>,
    pub chol_check: Option<f64>,
    pub bmi: Option<f64>,
    pub smoker: Option<f64>,
    pub stroke: Option<f64>,
    pub heart_disease_or_attack: Option<f64>,
    pub phys_activity: Option<f64>,
    pub fruits: Option<f64>,
    pub veggies: Option<f64>,
    pub hvy_alcohol_consump: Option<f64>,
    pub any_healthcare: Option<f64>,
    pub no_doc_bc_cost: Option<f64>,
    pub gen_hlth: Option<f64>,
    pub ment_hlth: Option<f64>,
    pub phys_hlth: Option<f64>,
    pub diff_walk: Option<f64>,
    pub sex: Option<BiologicalSex>,
    pub age: Option<f64>,
    pub education: Option<f64>,
    pub income: Option<f64>,
}

impl HealthSnapshot {
    /// Load survey answers from a `.toml` or `.json` file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let snapshot = if is_json {
            serde_json::from_str(&contents)?
        } else {
            toml::from_str(&contents)?
        };
        debug!(path = %path.display(), "loaded survey snapshot");
        Ok(snapshot)
    }
}
