//! The enumerated form schema.
//!
//! Every input the form offers is described once here: its record field name,
//! the label shown to the user, and its domain (closed option list, or integer
//! with optional bounds and a default). The TUI, the `predict`/`schema`
//! subcommands and record validation all read this table.

use crate::domain::{FieldValue, RecordError};

pub const JOB_OPTIONS: [&str; 12] = [
    "admin.",
    "technician",
    "services",
    "management",
    "retired",
    "blue-collar",
    "unemployed",
    "entrepreneur",
    "housemaid",
    "self-employed",
    "student",
    "unknown",
];
pub const MARITAL_OPTIONS: [&str; 3] = ["married", "single", "divorced"];
pub const EDUCATION_OPTIONS: [&str; 4] = ["primary", "secondary", "tertiary", "unknown"];
pub const YES_NO_OPTIONS: [&str; 2] = ["yes", "no"];
pub const CONTACT_OPTIONS: [&str; 3] = ["cellular", "telephone", "unknown"];
pub const MONTH_OPTIONS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];
pub const POUTCOME_OPTIONS: [&str; 4] = ["success", "failure", "other", "unknown"];

/// Allowed values for one input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    /// Closed option list; the first option is the default.
    Categorical { options: &'static [&'static str] },
    /// Whole number with optional inclusive bounds.
    Integer {
        min: Option<i64>,
        max: Option<i64>,
        default: i64,
    },
}

/// One form input and the record field it feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub domain: Domain,
}

/// All inputs, in the order the form shows them.
pub const FIELDS: [FieldSpec; 16] = [
    categorical("job", "Job", &JOB_OPTIONS),
    categorical("marital", "Marital Status", &MARITAL_OPTIONS),
    categorical("education", "Education", &EDUCATION_OPTIONS),
    categorical("default", "Default Credit?", &YES_NO_OPTIONS),
    categorical("housing", "Housing Loan?", &YES_NO_OPTIONS),
    categorical("loan", "Personal Loan?", &YES_NO_OPTIONS),
    categorical("contact", "Contact Type", &CONTACT_OPTIONS),
    categorical("month", "Last Contact Month", &MONTH_OPTIONS),
    categorical("poutcome", "Previous Campaign Outcome", &POUTCOME_OPTIONS),
    integer("age", "Age", Some(18), Some(100), 35),
    integer("balance", "Account Balance (€)", None, None, 1000),
    integer("day", "Last Contact Day", Some(1), Some(31), 15),
    integer("duration", "Call Duration (sec)", Some(0), Some(5000), 250),
    integer("campaign", "Contacts During Campaign", Some(1), Some(50), 2),
    integer("pdays", "Days Since Last Contact", None, None, 999),
    integer("previous", "Previous Campaign Contacts", None, None, 0),
];

const fn categorical(
    name: &'static str,
    label: &'static str,
    options: &'static [&'static str],
) -> FieldSpec {
    FieldSpec {
        name,
        label,
        domain: Domain::Categorical { options },
    }
}

const fn integer(
    name: &'static str,
    label: &'static str,
    min: Option<i64>,
    max: Option<i64>,
    default: i64,
) -> FieldSpec {
    FieldSpec {
        name,
        label,
        domain: Domain::Integer { min, max, default },
    }
}

/// Look up a field by its record name.
pub fn field(name: &str) -> Option<&'static FieldSpec> {
    FIELDS.iter().find(|f| f.name == name)
}

/// Position of a field in [`FIELDS`].
pub fn field_index(name: &str) -> Option<usize> {
    FIELDS.iter().position(|f| f.name == name)
}

/// Every field paired with its default value, in form order.
pub fn default_values() -> Vec<(&'static str, FieldValue)> {
    FIELDS.iter().map(|f| (f.name, f.default_value())).collect()
}

impl FieldSpec {
    pub fn default_value(&self) -> FieldValue {
        match self.domain {
            Domain::Categorical { options } => {
                FieldValue::Category(options.first().copied().unwrap_or_default().to_string())
            }
            Domain::Integer { default, .. } => FieldValue::Integer(default),
        }
    }

    pub fn is_categorical(&self) -> bool {
        matches!(self.domain, Domain::Categorical { .. })
    }

    /// Check a value against this field's domain.
    pub fn check(&self, value: &FieldValue) -> Result<(), RecordError> {
        match (self.domain, value) {
            (Domain::Categorical { options }, FieldValue::Category(v)) => {
                if options.contains(&v.as_str()) {
                    Ok(())
                } else {
                    Err(RecordError::InvalidCategory {
                        field: self.name.to_string(),
                        value: v.clone(),
                        options: options.join(", "),
                    })
                }
            }
            (Domain::Integer { min, max, .. }, FieldValue::Integer(v)) => {
                let below = min.is_some_and(|m| *v < m);
                let above = max.is_some_and(|m| *v > m);
                if below || above {
                    Err(RecordError::OutOfRange {
                        field: self.name.to_string(),
                        value: *v,
                        range: self.describe_domain(),
                    })
                } else {
                    Ok(())
                }
            }
            (Domain::Categorical { .. }, found) => Err(RecordError::WrongKind {
                field: self.name.to_string(),
                expected: "one of the listed options",
                found: found.to_string(),
            }),
            (Domain::Integer { .. }, found) => Err(RecordError::WrongKind {
                field: self.name.to_string(),
                expected: "a whole number",
                found: found.to_string(),
            }),
        }
    }

    /// Parse user text into a value of this field's kind, then check it.
    pub fn parse(&self, raw: &str) -> Result<FieldValue, RecordError> {
        let raw = raw.trim();
        let value = match self.domain {
            Domain::Categorical { .. } => FieldValue::Category(raw.to_string()),
            Domain::Integer { .. } => {
                let n = raw.parse::<i64>().map_err(|_| RecordError::WrongKind {
                    field: self.name.to_string(),
                    expected: "a whole number",
                    found: raw.to_string(),
                })?;
                FieldValue::Integer(n)
            }
        };
        self.check(&value)?;
        Ok(value)
    }

    /// Human-readable domain, e.g. `18..=100`, `≥ 1`, `yes | no`.
    pub fn describe_domain(&self) -> String {
        match self.domain {
            Domain::Categorical { options } => options.join(" | "),
            Domain::Integer { min, max, .. } => match (min, max) {
                (Some(lo), Some(hi)) => format!("{lo}..={hi}"),
                (Some(lo), None) => format!("≥ {lo}"),
                (None, Some(hi)) => format!("≤ {hi}"),
                (None, None) => "any whole number".to_string(),
            },
        }
    }
}
