//! Two-class estimators over an encoded feature vector.
//!
//! Each estimator is validated once when the artifact is loaded so that
//! `positive_probability` cannot index out of bounds or loop.

use nalgebra::DVector;

use crate::model::{EstimatorSpec, ModelError, TreeSpec};

#[derive(Debug, Clone)]
pub enum Estimator {
    LogisticRegression {
        coefficients: DVector<f64>,
        intercept: f64,
    },
    RandomForest {
        trees: Vec<Tree>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Node {
    Leaf(f64),
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Estimator {
    /// Build from the artifact spec, checking it against the encoder width.
    pub fn from_spec(spec: &EstimatorSpec, width: usize) -> Result<Self, ModelError> {
        match spec {
            EstimatorSpec::LogisticRegression {
                coefficients,
                intercept,
            } => {
                if coefficients.len() != width {
                    return Err(ModelError::Incompatible(format!(
                        "logistic regression has {} coefficients but the encoder produces {width} features",
                        coefficients.len()
                    )));
                }
                if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
                    return Err(ModelError::Incompatible(
                        "logistic regression has non-finite parameters".to_string(),
                    ));
                }
                Ok(Self::LogisticRegression {
                    coefficients: DVector::from_column_slice(coefficients),
                    intercept: *intercept,
                })
            }
            EstimatorSpec::RandomForest { trees } => {
                if trees.is_empty() {
                    return Err(ModelError::Incompatible("random forest has no trees".to_string()));
                }
                let trees = trees
                    .iter()
                    .enumerate()
                    .map(|(i, t)| {
                        Tree::from_spec(t, width).map_err(|msg| {
                            ModelError::Incompatible(format!("random forest tree {i}: {msg}"))
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Self::RandomForest { trees })
            }
        }
    }

    /// Positive-class probability for one encoded sample.
    pub fn positive_probability(&self, x: &DVector<f64>) -> Result<f64, ModelError> {
        let p = match self {
            Self::LogisticRegression {
                coefficients,
                intercept,
            } => {
                let z = coefficients.dot(x) + intercept;
                if z.is_nan() {
                    return Err(ModelError::Incompatible(
                        "logistic regression produced a non-finite decision value".to_string(),
                    ));
                }
                sigmoid(z)
            }
            Self::RandomForest { trees } => {
                let sum: f64 = trees.iter().map(|t| t.leaf_value(x)).sum();
                sum / trees.len() as f64
            }
        };
        Ok(p.clamp(0.0, 1.0))
    }
}

impl Tree {
    fn from_spec(spec: &TreeSpec, width: usize) -> Result<Self, String> {
        let n = spec.children_left.len();
        if n == 0 {
            return Err("tree has no nodes".to_string());
        }
        if [
            spec.children_right.len(),
            spec.feature.len(),
            spec.threshold.len(),
            spec.value.len(),
        ]
        .iter()
        .any(|len| *len != n)
        {
            return Err("node arrays have different lengths".to_string());
        }

        let mut nodes = Vec::with_capacity(n);
        for i in 0..n {
            let left = spec.children_left[i];
            if left == -1 {
                let value = spec.value[i];
                if !(0.0..=1.0).contains(&value) {
                    return Err(format!("leaf {i} has value {value} outside [0, 1]"));
                }
                nodes.push(Node::Leaf(value));
                continue;
            }

            let right = spec.children_right[i];
            let child = |c: i64| -> Result<usize, String> {
                // Children after their parent guarantees traversal terminates.
                usize::try_from(c)
                    .ok()
                    .filter(|c| *c > i && *c < n)
                    .ok_or_else(|| format!("node {i} has invalid child index {c}"))
            };
            let feature = usize::try_from(spec.feature[i])
                .ok()
                .filter(|f| *f < width)
                .ok_or_else(|| format!("node {i} splits on feature {} (width {width})", spec.feature[i]))?;
            let threshold = spec.threshold[i];
            if threshold.is_nan() {
                return Err(format!("node {i} has a NaN threshold"));
            }
            nodes.push(Node::Split {
                feature,
                threshold,
                left: child(left)?,
                right: child(right)?,
            });
        }

        Ok(Self { nodes })
    }

    fn leaf_value(&self, x: &DVector<f64>) -> f64 {
        let mut i = 0;
        loop {
            match self.nodes[i] {
                Node::Leaf(value) => return value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    i = if x[feature] <= threshold { left } else { right };
                }
            }
        }
    }
}

/// Logistic function, evaluated without overflow for large `|z|`.
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}
