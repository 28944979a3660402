//! Feature vector layout and assembly
//!
//! The model consumes 21 scalars in a fixed order. Each slot has a fixed
//! meaning and a default that stands in when the snapshot has no value for it.
//! Values pass through untouched: no scaling, clamping or normalization.
use serde::{Deserialize, Serialize};

use crate::errors::{Result, RiskCoreError};
use crate::snapshot::{BiologicalSex, HealthSnapshot};

/// Number of features consumed by the model
pub const FEATURE_COUNT: usize = 21;

/// Slot in the feature vector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FeatureIndex {
    HighBp,
    HighChol,
    CholCheck,
    Bmi,
    Smoker,
    Stroke,
    HeartDiseaseOrAttack,
    PhysActivity,
    Fruits,
    Veggies,
    HvyAlcoholConsump,
    AnyHealthcare,
    NoDocBcCost,
    GenHlth,
    MentHlth,
    PhysHlth,
    DiffWalk,
    Sex,
    Age,
    Education,
    Income,
}

impl FeatureIndex {
    /// All slots in vector order
    pub const ALL: [FeatureIndex; FEATURE_COUNT] = [
        FeatureIndex::HighBp,
        FeatureIndex::HighChol,
        FeatureIndex::CholCheck,
        FeatureIndex::Bmi,
        FeatureIndex::Smoker,
        FeatureIndex::Stroke,
        FeatureIndex::HeartDiseaseOrAttack,
        FeatureIndex::PhysActivity,
        FeatureIndex::Fruits,
        FeatureIndex::Veggies,
        FeatureIndex::HvyAlcoholConsump,
        FeatureIndex::AnyHealthcare,
        FeatureIndex::NoDocBcCost,
        FeatureIndex::GenHlth,
        FeatureIndex::MentHlth,
        FeatureIndex::PhysHlth,
        FeatureIndex::DiffWalk,
        FeatureIndex::Sex,
        FeatureIndex::Age,
        FeatureIndex::Education,
        FeatureIndex::Income,
    ];

    /// Position of this slot in the vector
    pub fn index(self) -> usize {
        self as usize
    }

    /// Column name used by the model artifact
    pub fn name(self) -> &'static str {
        match self {
            FeatureIndex::HighBp => "HighBP",
            FeatureIndex::HighChol => "HighChol",
            FeatureIndex::CholCheck => "CholCheck",
            FeatureIndex::Bmi => "BMI",
            FeatureIndex::Smoker => "Smoker",
            FeatureIndex::Stroke => "Stroke",
            FeatureIndex::HeartDiseaseOrAttack => "HeartDiseaseorAttack",
            FeatureIndex::PhysActivity => "PhysActivity",
            FeatureIndex::Fruits => "Fruits",
            FeatureIndex::Veggies => "Veggies",
            FeatureIndex::HvyAlcoholConsump => "HvyAlcoholConsump",
            FeatureIndex::AnyHealthcare => "AnyHealthcare",
            FeatureIndex::NoDocBcCost => "NoDocbcCost",
            FeatureIndex::GenHlth => "GenHlth",
            FeatureIndex::MentHlth => "MentHlth",
            FeatureIndex::PhysHlth => "PhysHlth",
            FeatureIndex::DiffWalk => "DiffWalk",
            FeatureIndex::Sex => "Sex",
            FeatureIndex::Age => "Age",
            FeatureIndex::Education => "Education",
            FeatureIndex::Income => "Income",
        }
    }

    /// Value used when the snapshot has nothing for this slot
    ///
    /// Binary flags are 0/1, `GenHlth` is the 1..=5 self rating,
    /// `MentHlth`/`PhysHlth` count days out of the last 30.
    pub fn default_value(self) -> f64 {
        match self {
            FeatureIndex::HighBp => 0.0,
            FeatureIndex::HighChol => 0.0,
            FeatureIndex::CholCheck => 0.0,
            FeatureIndex::Bmi => 21.0,
            FeatureIndex::Smoker => 0.0,
            FeatureIndex::Stroke => 0.0,
            FeatureIndex::HeartDiseaseOrAttack => 0.0,
            FeatureIndex::PhysActivity => 1.0,
            FeatureIndex::Fruits => 1.0,
            FeatureIndex::Veggies => 1.0,
            FeatureIndex::HvyAlcoholConsump => 0.0,
            FeatureIndex::AnyHealthcare => 1.0,
            FeatureIndex::NoDocBcCost => 0.0,
            FeatureIndex::GenHlth => 3.0,
            FeatureIndex::MentHlth => 25.0,
            FeatureIndex::PhysHlth => 25.0,
            FeatureIndex::DiffWalk => 0.0,
            FeatureIndex::Sex => 0.0,
            FeatureIndex::Age => 21.0,
            FeatureIndex::Education => 5.0,
            FeatureIndex::Income => 1.0,
        }
    }

    /// Look up a slot by its column name (case-insensitive)
    pub fn from_name(name: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|feature| feature.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| RiskCoreError::UnknownFeature(name.to_string()))
    }
}

impl std::fmt::Display for FeatureIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Fixed-order model input
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    /// Vector made entirely of the documented defaults
    pub fn defaults() -> Self {
        let mut values = [0.0; FEATURE_COUNT];
        for feature in FeatureIndex::ALL {
            values[feature.index()] = feature.default_value();
        }
        Self(values)
    }

    pub fn get(&self, feature: FeatureIndex) -> f64 {
        self.0[feature.index()]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Always `FEATURE_COUNT`
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `(column name, value)` pairs in vector order
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FeatureIndex::ALL
            .iter()
            .map(move |feature| (feature.name(), self.get(*feature)))
    }
}

impl TryFrom<Vec<f64>> for FeatureVector {
    type Error = RiskCoreError;

    fn try_from(values: Vec<f64>) -> Result<Self> {
        let actual = values.len();
        let array: [f64; FEATURE_COUNT] =
            values.try_into().map_err(|_| RiskCoreError::FeatureShape {
                expected: FEATURE_COUNT,
                actual,
            })?;
        Ok(Self(array))
    }
}

impl From<FeatureVector> for Vec<f64> {
    fn from(vector: FeatureVector) -> Self {
        vector.0.to_vec()
    }
}

/// Five-year age group code for an age in whole years
///
/// The `Age` slot uses the survey's 13-level grouping: 1 is 18-24, each
/// following code covers five years, 13 is 80 and older. Ages below 18 fall
/// into group 1.
pub fn age_category(years: i32) -> f64 {
    match years {
        i32::MIN..=24 => 1.0,
        80.. => 13.0,
        _ => f64::from((years - 25) / 5 + 2),
    }
}

/// Build the model input from a snapshot
///
/// Present values are copied as-is, absent ones take the slot default.
/// `Sex` is 1.0 for `Male` and 0.0 for everything else, absent included.
pub fn assemble_features(snapshot: &HealthSnapshot) -> FeatureVector {
    let pick = |value: Option<f64>, feature: FeatureIndex| value.unwrap_or(feature.default_value());
    let sex = match snapshot.sex {
        Some(BiologicalSex::Male) => 1.0,
        _ => 0.0,
    };

    FeatureVector([
        pick(snapshot.high_bp, FeatureIndex::HighBp),
        pick(snapshot.high_chol, FeatureIndex::HighChol),
        pick(snapshot.chol_check, FeatureIndex::CholCheck),
        pick(snapshot.bmi, FeatureIndex::Bmi),
        pick(snapshot.smoker, FeatureIndex::Smoker),
        pick(snapshot.stroke, FeatureIndex::Stroke),
        pick(snapshot.heart_disease_or_attack, FeatureIndex::HeartDiseaseOrAttack),
        pick(snapshot.phys_activity, FeatureIndex::PhysActivity),
        pick(snapshot.fruits, FeatureIndex::Fruits),
        pick(snapshot.veggies, FeatureIndex::Veggies),
        pick(snapshot.hvy_alcohol_consump, FeatureIndex::HvyAlcoholConsump),
        pick(snapshot.any_healthcare, FeatureIndex::AnyHealthcare),
        pick(snapshot.no_doc_bc_cost, FeatureIndex::NoDocBcCost),
        pick(snapshot.gen_hlth, FeatureIndex::GenHlth),
        pick(snapshot.ment_hlth, FeatureIndex::MentHlth),
        pick(snapshot.phys_hlth, FeatureIndex::PhysHlth),
        pick(snapshot.diff_walk, FeatureIndex::DiffWalk),
        sex,
        pick(snapshot.age, FeatureIndex::Age),
        pick(snapshot.education, FeatureIndex::Education),
        pick(snapshot.income, FeatureIndex::Income),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_snapshot() -> HealthSnapshot {
        HealthSnapshot {
            high_bp: Some(1.0),
            high_chol: Some(1.0),
            chol_check: Some(1.0),
            bmi: Some(40.0),
            smoker: Some(1.0),
            stroke: Some(0.0),
            heart_disease_or_attack: Some(0.0),
            phys_activity: Some(0.0),
            fruits: Some(0.0),
            veggies: Some(1.0),
            hvy_alcohol_consump: Some(0.0),
            any_healthcare: Some(1.0),
            no_doc_bc_cost: Some(0.0),
            gen_hlth: Some(5.0),
            ment_hlth: Some(18.0),
            phys_hlth: Some(15.0),
            diff_walk: Some(1.0),
            sex: Some(BiologicalSex::Female),
            age: Some(9.0),
            education: Some(4.0),
            income: Some(3.0),
        }
    }

    #[test]
    fn test_indices_follow_declaration_order() {
        for (position, feature) in FeatureIndex::ALL.iter().enumerate() {
            assert_eq!(feature.index(), position);
        }
        assert_eq!(FeatureIndex::Income.index(), FEATURE_COUNT - 1);
    }

    #[test]
    fn test_empty_snapshot_yields_defaults() {
        let features = assemble_features(&HealthSnapshot::default());
        assert_eq!(features.len(), FEATURE_COUNT);
        assert_eq!(features, FeatureVector::defaults());
        assert_eq!(features.get(FeatureIndex::PhysActivity), 1.0);
        assert_eq!(features.get(FeatureIndex::GenHlth), 3.0);
        assert_eq!(features.get(FeatureIndex::Sex), 0.0);
    }

    #[test]
    fn test_full_snapshot_passes_values_through() {
        let features = assemble_features(&full_snapshot());
        let expected = vec![
            1.0, 1.0, 1.0, 40.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 5.0, 18.0, 15.0,
            1.0, 0.0, 9.0, 4.0, 3.0,
        ];
        assert_eq!(features.as_slice(), expected.as_slice());
    }

    #[test]
    fn test_partial_snapshot_mixes_values_and_defaults() {
        let snapshot = HealthSnapshot {
            bmi: Some(27.5),
            age: Some(44.0),
            ..HealthSnapshot::default()
        };
        let features = assemble_features(&snapshot);

        assert_eq!(features.get(FeatureIndex::Bmi), 27.5);
        assert_eq!(features.get(FeatureIndex::Age), 44.0);
        assert_eq!(features.get(FeatureIndex::Education), 5.0);
        assert_eq!(features.get(FeatureIndex::MentHlth), 25.0);
    }

    #[test]
    fn test_sex_mapping() {
        let mut snapshot = HealthSnapshot::default();
        for (sex, expected) in [
            (Some(BiologicalSex::Male), 1.0),
            (Some(BiologicalSex::Female), 0.0),
            (Some(BiologicalSex::Other), 0.0),
            (Some(BiologicalSex::NotSet), 0.0),
            (None, 0.0),
        ] {
            snapshot.sex = sex;
            assert_eq!(assemble_features(&snapshot).get(FeatureIndex::Sex), expected);
        }
    }

    #[test]
    fn test_assembly_is_deterministic() {
        let snapshot = full_snapshot();
        let first = assemble_features(&snapshot);
        let second = assemble_features(&snapshot);
        assert_eq!(first, second);
    }

    #[test]
    fn test_vector_rejects_wrong_length() {
        let err = FeatureVector::try_from(vec![0.0; 20]).unwrap_err();
        assert!(matches!(
            err,
            RiskCoreError::FeatureShape { expected: 21, actual: 20 }
        ));
        assert!(FeatureVector::try_from(vec![0.0; FEATURE_COUNT]).is_ok());
    }

    #[test]
    fn test_vector_json_is_plain_array() {
        let json = serde_json::to_string(&FeatureVector::defaults()).unwrap();
        assert!(json.starts_with('['));
        let back: FeatureVector = serde_json::from_str(&json).unwrap();
        assert_eq!(back, FeatureVector::defaults());
        assert!(serde_json::from_str::<FeatureVector>("[1.0, 2.0]").is_err());
    }

    #[test]
    fn test_from_name() {
        assert_eq!(FeatureIndex::from_name("BMI").unwrap(), FeatureIndex::Bmi);
        assert_eq!(
            FeatureIndex::from_name("heartdiseaseorattack").unwrap(),
            FeatureIndex::HeartDiseaseOrAttack
        );
        assert!(FeatureIndex::from_name("Glucose").is_err());
    }

    #[test]
    fn test_named_pairs_in_order() {
        let names: Vec<&str> = FeatureVector::defaults().named().map(|(n, _)| n).collect();
        assert_eq!(names.first(), Some(&"HighBP"));
        assert_eq!(names.last(), Some(&"Income"));
        assert_eq!(names.len(), FEATURE_COUNT);
    }

    #[test]
    fn test_age_category_bands() {
        assert_eq!(age_category(12), 1.0);
        assert_eq!(age_category(24), 1.0);
        assert_eq!(age_category(25), 2.0);
        assert_eq!(age_category(47), 6.0);
        assert_eq!(age_category(54), 7.0);
        assert_eq!(age_category(79), 12.0);
        assert_eq!(age_category(80), 13.0);
        assert_eq!(age_category(103), 13.0);
    }
}
