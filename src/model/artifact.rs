//! Read model artifact JSON.
//!
//! The artifact is the portable export of a fitted pipeline:
//! - a column transformer (scaled numeric columns, one-hot categorical columns)
//! - a two-class estimator (logistic regression or random forest)
//! - metadata (format version, class labels, display name)
//!
//! This module only deserializes; `DepositModel::from_artifact` validates.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::model::{ARTIFACT_FILE, ModelError};

/// The only artifact layout this build understands.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    #[serde(default)]
    pub name: Option<String>,
    pub classes: Vec<i64>,
    #[serde(default)]
    pub numeric: Vec<NumericColumn>,
    #[serde(default)]
    pub categorical: Vec<CategoricalColumn>,
    pub estimator: EstimatorSpec,
}

/// Standard-scaled numeric column: `(x - mean) / scale`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericColumn {
    pub name: String,
    pub mean: f64,
    pub scale: f64,
}

/// One-hot encoded column; unseen values encode as all zeros.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalColumn {
    pub name: String,
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EstimatorSpec {
    LogisticRegression {
        coefficients: Vec<f64>,
        intercept: f64,
    },
    RandomForest {
        trees: Vec<TreeSpec>,
    },
}

/// A fitted decision tree in flat node-array form.
///
/// Node `i` is a leaf when `children_left[i] == -1`; `value[i]` is the
/// positive-class fraction of the training samples that reached it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeSpec {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<f64>,
}

impl EstimatorSpec {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::LogisticRegression { .. } => "logistic_regression",
            Self::RandomForest { .. } => "random_forest",
        }
    }
}

/// Resolve an artifact location: a directory holding `model.json`, or the file itself.
pub fn resolve_artifact_path(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(ARTIFACT_FILE)
    } else {
        path.to_path_buf()
    }
}

/// Read and deserialize a model artifact.
pub fn read_artifact(path: &Path) -> Result<ModelArtifact, ModelError> {
    let file_path = resolve_artifact_path(path);
    if !file_path.is_file() {
        return Err(ModelError::Missing(file_path));
    }

    let file = File::open(&file_path).map_err(|source| ModelError::Io {
        path: file_path.clone(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| ModelError::Parse {
        path: file_path,
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_bundled_artifact() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("saved_model");
        let artifact = read_artifact(&dir).unwrap();
        assert_eq!(artifact.format_version, FORMAT_VERSION);
        assert_eq!(artifact.classes, vec![0, 1]);
        assert_eq!(artifact.numeric.len(), 7);
        assert_eq!(artifact.categorical.len(), 9);
        assert_eq!(artifact.estimator.kind(), "logistic_regression");
    }

    #[test]
    fn missing_directory_is_reported_with_resolved_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_artifact(dir.path()).unwrap_err();
        match err {
            ModelError::Missing(path) => assert!(path.ends_with(ARTIFACT_FILE)),
            other => panic!("expected Missing, got {other:?}"),
        }
    }

    #[test]
    fn direct_file_path_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.json");
        std::fs::write(
            &path,
            r#"{
                "format_version": 1,
                "classes": [0, 1],
                "estimator": { "kind": "logistic_regression", "coefficients": [], "intercept": 0.25 }
            }"#,
        )
        .unwrap();

        let artifact = read_artifact(&path).unwrap();
        assert!(artifact.name.is_none());
        assert!(artifact.numeric.is_empty());
        assert_eq!(
            artifact.estimator,
            EstimatorSpec::LogisticRegression {
                coefficients: vec![],
                intercept: 0.25
            }
        );
    }

    #[test]
    fn garbage_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(ARTIFACT_FILE), b"\x80\x04pickle").unwrap();
        assert!(matches!(read_artifact(dir.path()), Err(ModelError::Parse { .. })));
    }
}
