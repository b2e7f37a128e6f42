//! The fixed-schema client record passed to the model.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::schema;

/// Record field names in model schema order.
pub const RECORD_FIELDS: [&str; 16] = [
    "age", "job", "marital", "education", "default", "balance", "housing", "loan", "contact",
    "day", "month", "duration", "campaign", "pdays", "previous", "poutcome",
];

/// A single input value: either an option of a closed list or a whole number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Category(String),
}

impl FieldValue {
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            Self::Category(_) => None,
        }
    }

    pub fn as_category(&self) -> Option<&str> {
        match self {
            Self::Category(v) => Some(v),
            Self::Integer(_) => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            Self::Category(v) => write!(f, "{v}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("unknown field '{0}'")]
    UnknownField(String),

    #[error("missing field '{0}'")]
    MissingField(String),

    #[error("field '{field}' expects {expected}, got '{found}'")]
    WrongKind {
        field: String,
        expected: &'static str,
        found: String,
    },

    #[error("field '{field}' does not accept '{value}' (options: {options})")]
    InvalidCategory {
        field: String,
        value: String,
        options: String,
    },

    #[error("field '{field}' value {value} is outside {range}")]
    OutOfRange {
        field: String,
        value: i64,
        range: String,
    },
}

/// One prediction request: every input, named as the model expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientRecord {
    pub age: i64,
    pub job: String,
    pub marital: String,
    pub education: String,
    pub default: String,
    pub balance: i64,
    pub housing: String,
    pub loan: String,
    pub contact: String,
    pub day: i64,
    pub month: String,
    pub duration: i64,
    pub campaign: i64,
    pub pdays: i64,
    pub previous: i64,
    pub poutcome: String,
}

impl ClientRecord {
    /// Build a record from named values.
    ///
    /// Values pass through unchanged. Every field must be present exactly by
    /// name and inside its schema domain; a later value for the same name
    /// replaces an earlier one.
    pub fn assemble<'a, I>(values: I) -> Result<Self, RecordError>
    where
        I: IntoIterator<Item = (&'a str, &'a FieldValue)>,
    {
        let mut by_name: BTreeMap<&'static str, &FieldValue> = BTreeMap::new();
        for (name, value) in values {
            let spec =
                schema::field(name).ok_or_else(|| RecordError::UnknownField(name.to_string()))?;
            spec.check(value)?;
            by_name.insert(spec.name, value);
        }

        let lookup = |name: &str| {
            by_name
                .get(name)
                .copied()
                .ok_or_else(|| RecordError::MissingField(name.to_string()))
        };
        let int = |name: &str| -> Result<i64, RecordError> {
            let value = lookup(name)?;
            value.as_integer().ok_or_else(|| RecordError::WrongKind {
                field: name.to_string(),
                expected: "a whole number",
                found: value.to_string(),
            })
        };
        let cat = |name: &str| -> Result<String, RecordError> {
            let value = lookup(name)?;
            value
                .as_category()
                .map(str::to_string)
                .ok_or_else(|| RecordError::WrongKind {
                    field: name.to_string(),
                    expected: "one of the listed options",
                    found: value.to_string(),
                })
        };

        Ok(Self {
            age: int("age")?,
            job: cat("job")?,
            marital: cat("marital")?,
            education: cat("education")?,
            default: cat("default")?,
            balance: int("balance")?,
            housing: cat("housing")?,
            loan: cat("loan")?,
            contact: cat("contact")?,
            day: int("day")?,
            month: cat("month")?,
            duration: int("duration")?,
            campaign: int("campaign")?,
            pdays: int("pdays")?,
            previous: int("previous")?,
            poutcome: cat("poutcome")?,
        })
    }

    /// Re-check every field against the schema (records read from JSON skip assembly).
    pub fn validate(&self) -> Result<(), RecordError> {
        for (name, value) in self.values() {
            let spec = schema::field(name).ok_or_else(|| RecordError::UnknownField(name.to_string()))?;
            spec.check(&value)?;
        }
        Ok(())
    }

    /// All fields in [`RECORD_FIELDS`] order.
    pub fn values(&self) -> [(&'static str, FieldValue); 16] {
        let int = |v: i64| FieldValue::Integer(v);
        let cat = |v: &str| FieldValue::Category(v.to_string());
        [
            ("age", int(self.age)),
            ("job", cat(&self.job)),
            ("marital", cat(&self.marital)),
            ("education", cat(&self.education)),
            ("default", cat(&self.default)),
            ("balance", int(self.balance)),
            ("housing", cat(&self.housing)),
            ("loan", cat(&self.loan)),
            ("contact", cat(&self.contact)),
            ("day", int(self.day)),
            ("month", cat(&self.month)),
            ("duration", int(self.duration)),
            ("campaign", int(self.campaign)),
            ("pdays", int(self.pdays)),
            ("previous", int(self.previous)),
            ("poutcome", cat(&self.poutcome)),
        ]
    }

    pub fn value(&self, name: &str) -> Option<FieldValue> {
        self.values()
            .into_iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
    }
}
