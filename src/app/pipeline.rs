//! Shared "predict" pipeline used by both CLI and TUI front-ends.
//!
//! form values -> record assembly -> model scoring
//!
//! The CLI and the TUI then only differ in presentation.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use chrono::{DateTime, Local};
use tracing::debug;

use crate::domain::{ClientRecord, FieldValue};
use crate::error::{AppError, EXIT_INPUT};
use crate::form::FormState;
use crate::model::{Classifier, ModelError, Prediction};

/// Outputs of one prediction request.
#[derive(Debug, Clone)]
pub struct PredictionRun {
    pub record: ClientRecord,
    pub prediction: Prediction,
    pub scored_at: DateTime<Local>,
}

/// Assemble the form into a record and score it.
pub fn run_prediction(model: &dyn Classifier, form: &FormState) -> Result<PredictionRun, AppError> {
    let record = form.assemble()?;
    let prediction = score_record(model, &record)?;
    Ok(PredictionRun {
        record,
        prediction,
        scored_at: Local::now(),
    })
}

/// Score an already assembled record.
pub fn score_record(model: &dyn Classifier, record: &ClientRecord) -> Result<Prediction, ModelError> {
    let prediction = model.score(record)?;
    debug!(
        outcome = %prediction.outcome,
        probability = prediction.probability,
        "scored client record"
    );
    Ok(prediction)
}

/// Build form values for `deposit predict`: defaults, then a record file, then overrides.
pub fn build_form(record_file: Option<&Path>, overrides: &[(String, String)]) -> Result<FormState, AppError> {
    let mut form = FormState::new();

    if let Some(path) = record_file {
        for (name, value) in read_partial_record(path)? {
            form.set(&name, value.clone()).inspect_err(|e| {
                debug!(field = %name, input = %value, source = %path.display(), "rejected input: {e}");
            })?;
        }
    }

    for (name, raw) in overrides {
        form.set_text(name, raw).inspect_err(|e| {
            debug!(field = %name, input = %raw, source = "--set", "rejected input: {e}");
        })?;
    }

    Ok(form)
}

fn read_partial_record(path: &Path) -> Result<BTreeMap<String, FieldValue>, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to open record '{}': {e}", path.display())))?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Invalid record JSON '{}': {e}", path.display())))
}
