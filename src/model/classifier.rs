//! The loaded deposit model.

use std::path::Path;

use tracing::{info, warn};

use crate::domain::ClientRecord;
use crate::model::encoder::FeatureEncoder;
use crate::model::estimator::Estimator;
use crate::model::{Classifier, FORMAT_VERSION, ModelArtifact, ModelError, read_artifact};

/// A validated, read-only model: encoder in front of an estimator.
#[derive(Debug, Clone)]
pub struct DepositModel {
    name: String,
    kind: &'static str,
    encoder: FeatureEncoder,
    estimator: Estimator,
}

impl DepositModel {
    /// Load and validate the artifact at `path` (directory or JSON file).
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let artifact = read_artifact(path)?;
        let model = Self::from_artifact(artifact)?;
        info!(
            path = %path.display(),
            model = %model.name,
            estimator = model.kind(),
            features = model.feature_count(),
            "model loaded"
        );
        Ok(model)
    }

    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self, ModelError> {
        if artifact.format_version != FORMAT_VERSION {
            return Err(ModelError::Incompatible(format!(
                "format_version {} is not supported (expected {FORMAT_VERSION})",
                artifact.format_version
            )));
        }
        if artifact.classes != [0, 1] {
            return Err(ModelError::Incompatible(format!(
                "expected classes [0, 1], found {:?}",
                artifact.classes
            )));
        }

        let encoder = FeatureEncoder::new(&artifact.numeric, &artifact.categorical)?;
        let estimator = Estimator::from_spec(&artifact.estimator, encoder.width())?;

        let unused = encoder.unused_fields();
        if !unused.is_empty() {
            warn!(fields = ?unused, "model ignores some form fields");
        }

        let kind = artifact.estimator.kind();
        Ok(Self {
            name: artifact.name.unwrap_or_else(|| kind.to_string()),
            kind,
            encoder,
            estimator,
        })
    }

    /// Estimator family, e.g. `logistic_regression`.
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn feature_count(&self) -> usize {
        self.encoder.width()
    }
}

impl Classifier for DepositModel {
    fn predict_proba(&self, record: &ClientRecord) -> Result<f64, ModelError> {
        record.validate()?;
        let x = self.encoder.encode(record)?;
        self.estimator.positive_probability(&x)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
