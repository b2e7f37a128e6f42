//! Inference adapter for the trained deposit classifier.
//!
//! The artifact is the JSON export of a fitted preprocessing + estimator
//! pipeline (`artifact`). Loading turns it into a validated, read-only
//! `DepositModel`: a feature encoder (`encoder`) in front of a two-class
//! estimator (`estimator`). Callers hold it by reference and score one
//! `ClientRecord` at a time through the `Classifier` trait.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::domain::{ClientRecord, RecordError};

pub mod artifact;
pub mod classifier;
pub mod encoder;
pub mod estimator;

pub use artifact::*;
pub use classifier::*;

/// File looked up inside an artifact directory.
pub const ARTIFACT_FILE: &str = "model.json";

/// Probability above which the positive class is predicted.
pub const DECISION_THRESHOLD: f64 = 0.5;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Model artifact not found at '{}'", .0.display())]
    Missing(PathBuf),

    #[error("Failed to read model artifact '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Model artifact '{}' is not valid JSON: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Incompatible model artifact: {0}")]
    Incompatible(String),

    #[error("Cannot score record: {0}")]
    Record(#[from] RecordError),
}

/// The two classes the model can predict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    No,
    Yes,
}

impl Outcome {
    pub fn from_probability(probability: f64) -> Self {
        if probability > DECISION_THRESHOLD {
            Self::Yes
        } else {
            Self::No
        }
    }

    /// Class label as stored in the training data (`1` = deposit).
    pub fn class_value(self) -> i64 {
        match self {
            Self::No => 0,
            Self::Yes => 1,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::No => write!(f, "no"),
            Self::Yes => write!(f, "yes"),
        }
    }
}

/// Result of scoring one record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    pub outcome: Outcome,
    /// Probability of the positive class, in `[0, 1]`.
    pub probability: f64,
}

/// A two-class model over client records.
pub trait Classifier {
    /// Probability of the positive class.
    fn predict_proba(&self, record: &ClientRecord) -> Result<f64, ModelError>;

    /// Display name of the loaded model.
    fn name(&self) -> &str;

    /// Predicted class.
    fn predict(&self, record: &ClientRecord) -> Result<Outcome, ModelError> {
        Ok(Outcome::from_probability(self.predict_proba(record)?))
    }

    /// Predicted class together with the positive-class probability.
    fn score(&self, record: &ClientRecord) -> Result<Prediction, ModelError> {
        let probability = self.predict_proba(record)?;
        Ok(Prediction {
            outcome: Outcome::from_probability(probability),
            probability,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_ties_go_to_negative_class() {
        assert_eq!(Outcome::from_probability(0.5), Outcome::No);
        assert_eq!(Outcome::from_probability(0.500_001), Outcome::Yes);
        assert_eq!(Outcome::from_probability(0.0), Outcome::No);
        assert_eq!(Outcome::from_probability(1.0), Outcome::Yes);
    }

    #[test]
    fn class_values_are_binary() {
        assert_eq!(Outcome::No.class_value(), 0);
        assert_eq!(Outcome::Yes.class_value(), 1);
    }
}
