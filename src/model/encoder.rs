//! Column transformer: client record → dense feature vector.
//!
//! Layout matches the exported pipeline: scaled numeric columns first, in
//! artifact order, then one indicator per category of each categorical column.

use nalgebra::DVector;

use crate::domain::{ClientRecord, RecordError, schema};
use crate::model::{CategoricalColumn, ModelError, NumericColumn};

#[derive(Debug, Clone)]
struct Scaled {
    name: String,
    mean: f64,
    scale: f64,
}

#[derive(Debug, Clone)]
struct OneHot {
    name: String,
    categories: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct FeatureEncoder {
    numeric: Vec<Scaled>,
    categorical: Vec<OneHot>,
    width: usize,
}

impl FeatureEncoder {
    /// Validate transformer columns against the form schema.
    pub fn new(numeric: &[NumericColumn], categorical: &[CategoricalColumn]) -> Result<Self, ModelError> {
        let mut seen: Vec<&str> = Vec::new();

        let mut scaled = Vec::with_capacity(numeric.len());
        for col in numeric {
            let spec = schema_field(&col.name, &mut seen)?;
            if spec.is_categorical() {
                return Err(incompatible(format!(
                    "column '{}' is categorical but listed as numeric",
                    col.name
                )));
            }
            // Subnormal scales overflow to infinity for ordinary inputs.
            if !col.mean.is_finite() || !col.scale.is_finite() || col.scale.abs() < f64::MIN_POSITIVE {
                return Err(incompatible(format!(
                    "column '{}' has invalid scaling (mean={}, scale={})",
                    col.name, col.mean, col.scale
                )));
            }
            scaled.push(Scaled {
                name: col.name.clone(),
                mean: col.mean,
                scale: col.scale,
            });
        }

        let mut one_hot = Vec::with_capacity(categorical.len());
        for col in categorical {
            let spec = schema_field(&col.name, &mut seen)?;
            if !spec.is_categorical() {
                return Err(incompatible(format!(
                    "column '{}' is numeric but listed as categorical",
                    col.name
                )));
            }
            if col.categories.is_empty() {
                return Err(incompatible(format!("column '{}' has no categories", col.name)));
            }
            one_hot.push(OneHot {
                name: col.name.clone(),
                categories: col.categories.clone(),
            });
        }

        let width = scaled.len() + one_hot.iter().map(|c| c.categories.len()).sum::<usize>();
        Ok(Self {
            numeric: scaled,
            categorical: one_hot,
            width,
        })
    }

    /// Length of the encoded feature vector.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Schema fields the model never reads.
    pub fn unused_fields(&self) -> Vec<&'static str> {
        schema::FIELDS
            .iter()
            .map(|f| f.name)
            .filter(|name| {
                !self.numeric.iter().any(|c| c.name == *name)
                    && !self.categorical.iter().any(|c| c.name == *name)
            })
            .collect()
    }

    pub fn encode(&self, record: &ClientRecord) -> Result<DVector<f64>, ModelError> {
        let mut x = DVector::zeros(self.width);
        let mut offset = 0;

        for col in &self.numeric {
            let value = field_value(record, &col.name)?;
            let n = value.as_integer().ok_or_else(|| RecordError::WrongKind {
                field: col.name.clone(),
                expected: "a whole number",
                found: value.to_string(),
            })?;
            x[offset] = (n as f64 - col.mean) / col.scale;
            offset += 1;
        }

        for col in &self.categorical {
            let value = field_value(record, &col.name)?;
            let v = value.as_category().ok_or_else(|| RecordError::WrongKind {
                field: col.name.clone(),
                expected: "one of the listed options",
                found: value.to_string(),
            })?;
            if let Some(pos) = col.categories.iter().position(|c| c == v) {
                x[offset + pos] = 1.0;
            }
            offset += col.categories.len();
        }

        Ok(x)
    }
}

fn schema_field<'a>(name: &'a str, seen: &mut Vec<&'a str>) -> Result<&'static schema::FieldSpec, ModelError> {
    if seen.contains(&name) {
        return Err(incompatible(format!("column '{name}' is listed twice")));
    }
    seen.push(name);
    schema::field(name).ok_or_else(|| incompatible(format!("column '{name}' is not a client record field")))
}

fn field_value(record: &ClientRecord, name: &str) -> Result<crate::domain::FieldValue, ModelError> {
    record
        .value(name)
        .ok_or_else(|| ModelError::Record(RecordError::MissingField(name.to_string())))
}

fn incompatible(message: String) -> ModelError {
    ModelError::Incompatible(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ClientRecord, FieldValue};

    fn record() -> ClientRecord {
        let values = schema::default_values();
        ClientRecord::assemble(values.iter().map(|(n, v)| (*n, v))).unwrap()
    }

    fn numeric(name: &str, mean: f64, scale: f64) -> NumericColumn {
        NumericColumn {
            name: name.to_string(),
            mean,
            scale,
        }
    }

    fn categorical(name: &str, categories: &[&str]) -> CategoricalColumn {
        CategoricalColumn {
            name: name.to_string(),
            categories: categories.iter().map(|c| c.to_string()).collect(),
        }
    }

    #[test]
    fn encodes_scaled_numerics_then_indicators() {
        let encoder = FeatureEncoder::new(
            &[numeric("age", 30.0, 5.0), numeric("duration", 250.0, 50.0)],
            &[categorical("contact", &["cellular", "telephone", "unknown"])],
        )
        .unwrap();
        assert_eq!(encoder.width(), 5);

        let x = encoder.encode(&record()).unwrap();
        assert_eq!(x.as_slice(), &[1.0, 0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn unseen_category_encodes_as_zeros() {
        let encoder = FeatureEncoder::new(&[], &[categorical("job", &["student", "retired"])]).unwrap();
        let x = encoder.encode(&record()).unwrap();
        assert_eq!(x.as_slice(), &[0.0, 0.0]);
    }

    #[test]
    fn reports_unused_fields() {
        let encoder = FeatureEncoder::new(&[numeric("age", 0.0, 1.0)], &[categorical("job", &["student"])]).unwrap();
        let unused = encoder.unused_fields();
        assert_eq!(unused.len(), 14);
        assert!(!unused.contains(&"age"));
        assert!(unused.contains(&"poutcome"));
    }

    #[test]
    fn rejects_mismatched_columns() {
        assert!(FeatureEncoder::new(&[numeric("salary", 0.0, 1.0)], &[]).is_err());
        assert!(FeatureEncoder::new(&[numeric("job", 0.0, 1.0)], &[]).is_err());
        assert!(FeatureEncoder::new(&[], &[categorical("age", &["35"])]).is_err());
        assert!(FeatureEncoder::new(&[numeric("age", 0.0, 0.0)], &[]).is_err());
        assert!(FeatureEncoder::new(&[numeric("age", f64::NAN, 1.0)], &[]).is_err());
        assert!(FeatureEncoder::new(&[], &[categorical("job", &[])]).is_err());
        assert!(
            FeatureEncoder::new(&[numeric("age", 0.0, 1.0), numeric("age", 0.0, 1.0)], &[]).is_err()
        );
    }

    #[test]
    fn rejects_subnormal_scale_at_construction() {
        let err = FeatureEncoder::new(
            &[numeric("age", 0.0, 1e-308), numeric("duration", 0.0, 1e-308)],
            &[],
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::Incompatible(msg) if msg.contains("age")));
        assert!(FeatureEncoder::new(&[numeric("age", 0.0, -f64::MIN_POSITIVE / 2.0)], &[]).is_err());
        assert!(FeatureEncoder::new(&[numeric("age", 0.0, f64::MIN_POSITIVE)], &[]).is_ok());
    }

    #[test]
    fn record_values_pass_through_unchanged() {
        let encoder = FeatureEncoder::new(&[numeric("balance", 0.0, 1.0)], &[]).unwrap();
        let mut r = record();
        r.balance = -42;
        assert_eq!(encoder.encode(&r).unwrap()[0], -42.0);
        assert_eq!(r.value("balance"), Some(FieldValue::Integer(-42)));
    }
}
