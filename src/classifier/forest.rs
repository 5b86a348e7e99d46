use serde::Deserialize;

use crate::error::EstimateError;
use crate::models::FEATURE_COUNT;

use super::Classifier;

/// Internal split: rows with `x[feature] <= threshold` go left.
#[derive(Debug, Clone, Deserialize)]
pub struct Split {
    pub feature: usize,
    pub threshold: f64,
    pub left: Box<TreeNode>,
    pub right: Box<TreeNode>,
}

/// Terminal node holding per-class weights (sample counts or probabilities).
#[derive(Debug, Clone, Deserialize)]
pub struct Leaf {
    pub value: Vec<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeNode {
    Split(Split),
    Leaf(Leaf),
}

impl TreeNode {
    fn leaf_for(&self, row: &[f64; FEATURE_COUNT]) -> &Leaf {
        let mut node = self;
        loop {
            match node {
                TreeNode::Leaf(leaf) => return leaf,
                TreeNode::Split(split) => {
                    node = if row[split.feature] <= split.threshold {
                        split.left.as_ref()
                    } else {
                        split.right.as_ref()
                    };
                }
            }
        }
    }

    fn check(&self, n_classes: usize) -> Result<(), String> {
        match self {
            TreeNode::Split(split) => {
                if split.feature >= FEATURE_COUNT {
                    return Err(format!(
                        "split on feature {} but only {} features exist",
                        split.feature, FEATURE_COUNT
                    ));
                }
                if !split.threshold.is_finite() {
                    return Err("split threshold is not finite".to_string());
                }
                split.left.check(n_classes)?;
                split.right.check(n_classes)
            }
            TreeNode::Leaf(leaf) => {
                if leaf.value.len() != n_classes {
                    return Err(format!(
                        "leaf has {} class weights, expected {}",
                        leaf.value.len(),
                        n_classes
                    ));
                }
                if leaf.value.iter().any(|v| !v.is_finite() || *v < 0.0) {
                    return Err("leaf weights must be finite and non-negative".to_string());
                }
                if leaf.value.iter().sum::<f64>() <= 0.0 {
                    return Err("leaf weights sum to zero".to_string());
                }
                Ok(())
            }
        }
    }
}

/// Random-forest style ensemble: the mean of each tree's normalized leaf distribution.
#[derive(Debug, Clone, Deserialize)]
pub struct ForestModel {
    #[serde(default = "default_n_classes")]
    pub n_classes: usize,
    pub trees: Vec<TreeNode>,
}

fn default_n_classes() -> usize {
    2
}

impl ForestModel {
    pub fn check(&self) -> Result<(), EstimateError> {
        if self.trees.is_empty() {
            return Err(EstimateError::ClassifierUnavailable(
                "forest model has no trees".to_string(),
            ));
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.check(self.n_classes).map_err(|e| {
                EstimateError::ClassifierUnavailable(format!("tree {}: {}", i, e))
            })?;
        }
        Ok(())
    }
}

impl Classifier for ForestModel {
    fn kind(&self) -> &'static str {
        "forest"
    }

    /// Tree structure is validated once by [`ForestModel::check`] when the
    /// artifact loads.
    fn predict_proba(&self, row: &[f64; FEATURE_COUNT]) -> Result<Vec<f64>, EstimateError> {
        if self.trees.is_empty() {
            return Err(EstimateError::ClassifierUnavailable(
                "forest model has no trees".to_string(),
            ));
        }
        debug_assert!(self.check().is_ok(), "forest used without validation");

        let mut totals = vec![0.0; self.n_classes];
        for tree in &self.trees {
            let leaf = tree.leaf_for(row);
            let sum: f64 = leaf.value.iter().sum();
            for (total, weight) in totals.iter_mut().zip(leaf.value.iter()) {
                *total += weight / sum;
            }
        }

        let n_trees = self.trees.len() as f64;
        Ok(totals.into_iter().map(|t| t / n_trees).collect())
    }
}
