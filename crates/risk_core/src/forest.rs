//! Random forest classifier artifact
//!
//! Each tree votes for one class label; the most voted label wins.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::errors::{Result, RiskCoreError};
use crate::features::{FeatureVector, FEATURE_COUNT};
use crate::scorer::{Prediction, Scorer, DIABETES_OUTPUT};

/// A decision tree node (internal or leaf)
///
/// Internal nodes send `x[feature] <= threshold` to `left`, everything else
/// to `right`. Leaves carry the class label in `leaf`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(default)]
    pub feature: usize,
    #[serde(default)]
    pub threshold: f64,
    #[serde(default)]
    pub left: usize,
    #[serde(default)]
    pub right: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leaf: Option<f64>,
}

impl Node {
    pub fn split(feature: usize, threshold: f64, left: usize, right: usize) -> Self {
        Self {
            feature,
            threshold,
            left,
            right,
            leaf: None,
        }
    }

    pub fn leaf(class: f64) -> Self {
        Self {
            feature: 0,
            threshold: 0.0,
            left: 0,
            right: 0,
            leaf: Some(class),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.leaf.is_some()
    }
}

/// Single decision tree, node 0 is the root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

impl Tree {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    /// Children must point strictly forward, which rules out cycles
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".into());
        }

        for (idx, node) in self.nodes.iter().enumerate() {
            if let Some(class) = node.leaf {
                if !class.is_finite() {
                    return Err(format!("leaf {} has a non-finite class", idx));
                }
                continue;
            }
            if node.feature >= FEATURE_COUNT {
                return Err(format!("node {} splits on unknown feature {}", idx, node.feature));
            }
            if !node.threshold.is_finite() {
                return Err(format!("node {} has a non-finite threshold", idx));
            }
            for child in [node.left, node.right] {
                if child <= idx || child >= self.nodes.len() {
                    return Err(format!("node {} has invalid child {}", idx, child));
                }
            }
        }

        Ok(())
    }

    /// Walk from the root to a leaf
    ///
    /// Every step must move to a later node, so a malformed tree errors out
    /// instead of looping.
    pub fn evaluate(&self, features: &FeatureVector) -> Result<f64> {
        let values = features.as_slice();
        let mut idx = 0usize;
        loop {
            let node = self.nodes.get(idx).ok_or_else(|| {
                RiskCoreError::ScoringFailed(format!("tree has no node {}", idx))
            })?;
            if let Some(class) = node.leaf {
                return Ok(class);
            }
            let value = values.get(node.feature).ok_or_else(|| {
                RiskCoreError::ScoringFailed(format!(
                    "node {} splits on unknown feature {}",
                    idx, node.feature
                ))
            })?;
            let next = if *value <= node.threshold {
                node.left
            } else {
                node.right
            };
            if next <= idx {
                return Err(RiskCoreError::ScoringFailed(format!(
                    "node {} has invalid child {}",
                    idx, next
                )));
            }
            idx = next;
        }
    }
}

/// Ensemble of voting trees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestModel {
    /// Output column name
    #[serde(default = "default_output")]
    pub output: String,
    pub trees: Vec<Tree>,
}

fn default_output() -> String {
    DIABETES_OUTPUT.to_string()
}

impl ForestModel {
    pub fn new(trees: Vec<Tree>) -> Self {
        Self {
            output: default_output(),
            trees,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.trees.is_empty() {
            return Err(RiskCoreError::ValidationFailed("Forest has no trees".into()));
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate().map_err(|e| {
                RiskCoreError::ValidationFailed(format!("Tree {} validation failed: {}", i, e))
            })?;
        }
        Ok(())
    }

    /// Vote count per class label, ascending by label
    fn tally(&self, features: &FeatureVector) -> Result<BTreeMap<OrderedClass, usize>> {
        let mut votes = BTreeMap::new();
        for tree in &self.trees {
            *votes.entry(OrderedClass(tree.evaluate(features)?)).or_insert(0) += 1;
        }
        Ok(votes)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct OrderedClass(f64);

impl Eq for OrderedClass {}

impl PartialOrd for OrderedClass {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderedClass {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Scorer for ForestModel {
    fn output_name(&self) -> &str {
        &self.output
    }

    fn score(&self, features: &FeatureVector) -> Result<Prediction> {
        self.validate()?;

        // ascending iteration + strict `>` keeps the smallest label on ties
        let mut winner: Option<(f64, usize)> = None;
        for (class, count) in self.tally(features)? {
            match winner {
                Some((_, best)) if count <= best => {}
                _ => winner = Some((class.0, count)),
            }
        }

        let (value, _) = winner
            .ok_or_else(|| RiskCoreError::ScoringFailed("Forest cast no votes".into()))?;
        Ok(Prediction::new(self.output.clone(), value))
    }
}
