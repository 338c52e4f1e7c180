//! Portable JSON model artifacts.
//!
//! Two model families are understood, both exported from the training
//! notebook without any preprocessing baked in:
//! - `logistic_regression`: one weight per feature plus an intercept
//! - `tree_ensemble`: flat scikit-learn style trees, averaged like a
//!   random forest (`x[feature] <= threshold` goes left)

use serde::Deserialize;

use super::{FeatureVector, ModelError, Predictor, FEATURE_COUNT};

fn default_threshold() -> f64 {
    0.5
}

fn default_classes() -> Vec<i64> {
    vec![0, 1]
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    LogisticRegression(LogisticModel),
    TreeEnsemble(TreeEnsemble),
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogisticModel {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default = "default_classes")]
    pub classes: Vec<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TreeEnsemble {
    #[serde(default = "default_classes")]
    pub classes: Vec<i64>,
    pub trees: Vec<Tree>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: Vec<f64>,
    },
}

impl ModelArtifact {
    /// Structural checks done once at load so inference never indexes out
    /// of bounds or loops.
    pub fn validate(&self) -> Result<(), ModelError> {
        match self {
            ModelArtifact::LogisticRegression(m) => m.validate(),
            ModelArtifact::TreeEnsemble(m) => m.validate(),
        }
    }

    pub fn classify(&self, features: &FeatureVector) -> i64 {
        match self {
            ModelArtifact::LogisticRegression(m) => m.classify(features),
            ModelArtifact::TreeEnsemble(m) => m.classify(features),
        }
    }
}

impl LogisticModel {
    fn validate(&self) -> Result<(), ModelError> {
        if self.coefficients.len() != FEATURE_COUNT {
            return Err(ModelError::Invalid(format!(
                "logistic_regression has {} coefficients, expected {FEATURE_COUNT}",
                self.coefficients.len()
            )));
        }
        if self.classes.len() != 2 {
            return Err(ModelError::Invalid(format!(
                "logistic_regression needs exactly 2 classes, got {}",
                self.classes.len()
            )));
        }
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(ModelError::Invalid(format!(
                "threshold {} outside [0, 1]",
                self.threshold
            )));
        }
        if self
            .coefficients
            .iter()
            .chain(std::iter::once(&self.intercept))
            .any(|w| !w.is_finite())
        {
            return Err(ModelError::Invalid("non-finite weight".into()));
        }
        Ok(())
    }

    pub fn probability(&self, features: &FeatureVector) -> f64 {
        let z: f64 = self
            .coefficients
            .iter()
            .zip(features.iter())
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept;
        1.0 / (1.0 + (-z).exp())
    }

    fn classify(&self, features: &FeatureVector) -> i64 {
        if self.probability(features) >= self.threshold {
            self.classes[1]
        } else {
            self.classes[0]
        }
    }
}

impl TreeEnsemble {
    fn validate(&self) -> Result<(), ModelError> {
        if self.classes.is_empty() {
            return Err(ModelError::Invalid("tree_ensemble has no classes".into()));
        }
        if self.trees.is_empty() {
            return Err(ModelError::Invalid("tree_ensemble has no trees".into()));
        }
        for (t, tree) in self.trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return Err(ModelError::Invalid(format!("tree {t} has no nodes")));
            }
            for (i, node) in tree.nodes.iter().enumerate() {
                match node {
                    TreeNode::Split {
                        feature,
                        threshold,
                        left,
                        right,
                    } => {
                        if *feature >= FEATURE_COUNT {
                            return Err(ModelError::Invalid(format!(
                                "tree {t} node {i}: feature {feature} out of range"
                            )));
                        }
                        if !threshold.is_finite() {
                            return Err(ModelError::Invalid(format!(
                                "tree {t} node {i}: non-finite threshold"
                            )));
                        }
                        // Children always follow their parent, which rules out cycles.
                        for child in [left, right] {
                            if *child <= i || *child >= tree.nodes.len() {
                                return Err(ModelError::Invalid(format!(
                                    "tree {t} node {i}: child {child} out of range"
                                )));
                            }
                        }
                    }
                    TreeNode::Leaf { value } => {
                        if value.len() != self.classes.len() {
                            return Err(ModelError::Invalid(format!(
                                "tree {t} node {i}: leaf has {} weights for {} classes",
                                value.len(),
                                self.classes.len()
                            )));
                        }
                        if value.iter().any(|v| !v.is_finite() || *v < 0.0) {
                            return Err(ModelError::Invalid(format!(
                                "tree {t} node {i}: leaf weights must be finite and non-negative"
                            )));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn leaf<'a>(tree: &'a Tree, features: &FeatureVector) -> &'a [f64] {
        let mut idx = 0;
        loop {
            match &tree.nodes[idx] {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if features[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
                TreeNode::Leaf { value } => return value,
            }
        }
    }

    /// Mean of the per-tree normalized leaf distributions.
    pub fn distribution(&self, features: &FeatureVector) -> Vec<f64> {
        let mut totals = vec![0.0; self.classes.len()];
        for tree in &self.trees {
            let leaf = Self::leaf(tree, features);
            let sum: f64 = leaf.iter().sum();
            if sum > 0.0 {
                for (total, w) in totals.iter_mut().zip(leaf) {
                    *total += w / sum;
                }
            }
        }
        let n = self.trees.len() as f64;
        totals.iter_mut().for_each(|t| *t /= n);
        totals
    }

    fn classify(&self, features: &FeatureVector) -> i64 {
        let dist = self.distribution(features);
        // First maximum wins ties, matching numpy's argmax.
        let mut best = 0;
        for (i, p) in dist.iter().enumerate() {
            if *p > dist[best] {
                best = i;
            }
        }
        self.classes[best]
    }
}

/// Predictor backed by a validated JSON artifact.
#[derive(Debug, Clone)]
pub struct JsonPredictor {
    artifact: ModelArtifact,
}

impl JsonPredictor {
    pub fn new(artifact: ModelArtifact) -> Result<Self, ModelError> {
        artifact.validate()?;
        Ok(Self { artifact })
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, ModelError> {
        let artifact: ModelArtifact = serde_json::from_slice(bytes)
            .map_err(|e| ModelError::Invalid(format!("JSON parse failed: {e}")))?;
        Self::new(artifact)
    }
}

impl Predictor for JsonPredictor {
    fn predict(&self, features: &FeatureVector) -> Result<i64, ModelError> {
        Ok(self.artifact.classify(features))
    }

    fn describe(&self) -> String {
        match &self.artifact {
            ModelArtifact::LogisticRegression(_) => {
                format!("logistic regression ({FEATURE_COUNT} features)")
            }
            ModelArtifact::TreeEnsemble(m) => format!(
                "tree ensemble ({} trees, {} classes)",
                m.trees.len(),
                m.classes.len()
            ),
        }
    }
}
