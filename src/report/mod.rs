//! Formatted output for predictions and the field schema.
//!
//! Formatting lives in one place so the CLI and the TUI word results the same
//! way.

use serde::Serialize;

use crate::domain::{ClientRecord, Domain, FIELDS};
use crate::model::{Outcome, Prediction};

pub const TITLE: &str = "Long-Term Investor Prediction";
pub const SUBTITLE: &str = "Enter Client Information.";
pub const RESULT_HEADING: &str = "Prediction Result";
pub const CREDIT: &str =
    "Developed by Oluwakemi – ©2025 · linkedin.com/in/oluwakemi-sorinmade · github.com/Olukem";

/// Headline for a predicted class.
pub fn outcome_text(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Yes => "✅ YES — Likely to deposit",
        Outcome::No => "❌ NO — Unlikely to deposit",
    }
}

/// Probability as a percentage with two decimals, e.g. `63.51%`.
pub fn format_confidence(probability: f64) -> String {
    format!("{:.2}%", probability * 100.0)
}

/// Plain-text result block printed by `deposit predict`.
pub fn format_prediction(prediction: &Prediction) -> String {
    format!(
        "{RESULT_HEADING}\n{}\nConfidence Score: {}",
        outcome_text(prediction.outcome),
        format_confidence(prediction.probability)
    )
}

/// Machine-readable prediction printed by `deposit predict --json`.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionReport<'a> {
    pub model: &'a str,
    pub record: &'a ClientRecord,
    pub label: i64,
    pub outcome: Outcome,
    pub probability: f64,
}

impl<'a> PredictionReport<'a> {
    pub fn new(model: &'a str, record: &'a ClientRecord, prediction: &Prediction) -> Self {
        Self {
            model,
            record,
            label: prediction.outcome.class_value(),
            outcome: prediction.outcome,
            probability: prediction.probability,
        }
    }
}

/// Field table printed by `deposit schema`.
pub fn format_schema() -> String {
    let name_w = FIELDS.iter().map(|f| f.name.len()).max().unwrap_or(0);
    let label_w = FIELDS.iter().map(|f| f.label.chars().count()).max().unwrap_or(0);

    let mut out = String::new();
    out.push_str(&format!(
        "{:<name_w$}  {:<label_w$}  {:<7}  {}\n",
        "field", "label", "default", "domain"
    ));
    for spec in FIELDS.iter() {
        let default = match spec.domain {
            Domain::Categorical { .. } => spec.default_value().to_string(),
            Domain::Integer { default, .. } => default.to_string(),
        };
        // Pad by chars; `€` is one column but three bytes.
        let label_pad = label_w.saturating_sub(spec.label.chars().count());
        out.push_str(&format!(
            "{:<name_w$}  {}{}  {:<7}  {}\n",
            spec.name,
            spec.label,
            " ".repeat(label_pad),
            default,
            spec.describe_domain()
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_has_two_decimals() {
        assert_eq!(format_confidence(0.763_590_427), "76.36%");
        assert_eq!(format_confidence(0.0), "0.00%");
        assert_eq!(format_confidence(1.0), "100.00%");
    }

    #[test]
    fn prediction_block_mentions_label_and_score() {
        let text = format_prediction(&Prediction {
            outcome: Outcome::No,
            probability: 0.359_695,
        });
        assert_eq!(
            text,
            "Prediction Result\n❌ NO — Unlikely to deposit\nConfidence Score: 35.97%"
        );
    }

    #[test]
    fn schema_lists_every_field() {
        let table = format_schema();
        assert_eq!(table.lines().count(), 17);
        assert!(table.contains("Account Balance (€)"));
        assert!(table.contains("18..=100"));
        assert!(table.lines().any(|l| l.starts_with("pdays") && l.contains("999")));
    }

    #[test]
    fn json_report_carries_binary_label() {
        let form = crate::form::FormState::new();
        let record = form.assemble().unwrap();
        let prediction = Prediction {
            outcome: Outcome::Yes,
            probability: 0.9,
        };
        let json = serde_json::to_value(PredictionReport::new("m", &record, &prediction)).unwrap();
        assert_eq!(json["label"], 1);
        assert_eq!(json["outcome"], "yes");
        assert_eq!(json["record"]["age"], 35);
    }
}
