//! Form state: the current value of every input.
//!
//! The form is a plain vector aligned with `domain::FIELDS`. It knows how to
//! step a value inside its declared domain and how to hand its values to
//! record assembly. Focus and text editing belong to the front-end.

use crate::domain::{ClientRecord, Domain, FIELDS, FieldSpec, FieldValue, RecordError, schema};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    values: Vec<FieldValue>,
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}

impl FormState {
    /// Every input on its schema default.
    pub fn new() -> Self {
        Self {
            values: FIELDS.iter().map(FieldSpec::default_value).collect(),
        }
    }

    pub fn value(&self, index: usize) -> Option<&FieldValue> {
        self.values.get(index)
    }

    /// Inputs paired with their specs, in form order.
    pub fn entries(&self) -> impl Iterator<Item = (&'static FieldSpec, &FieldValue)> + '_ {
        FIELDS.iter().zip(self.values.iter())
    }

    /// Move a value by `delta` steps.
    ///
    /// Categorical inputs cycle through their options (wrapping); integer
    /// inputs saturate at their bounds. Returns whether the value changed.
    pub fn adjust(&mut self, index: usize, delta: i64) -> bool {
        let (Some(spec), Some(value)) = (FIELDS.get(index), self.values.get_mut(index)) else {
            return false;
        };

        let next = match (spec.domain, &*value) {
            (Domain::Categorical { options }, FieldValue::Category(current)) => {
                let pos = options.iter().position(|o| *o == current.as_str()).unwrap_or(0) as i64;
                let len = options.len() as i64;
                let idx = (pos + delta).rem_euclid(len.max(1)) as usize;
                FieldValue::Category(options.get(idx).copied().unwrap_or_default().to_string())
            }
            (Domain::Integer { min, max, .. }, FieldValue::Integer(current)) => {
                let mut n = current.saturating_add(delta);
                if let Some(lo) = min {
                    n = n.max(lo);
                }
                if let Some(hi) = max {
                    n = n.min(hi);
                }
                FieldValue::Integer(n)
            }
            _ => spec.default_value(),
        };

        let changed = *value != next;
        *value = next;
        changed
    }

    /// Replace a value from user text; rejected text leaves the value untouched.
    pub fn set_from_text(&mut self, index: usize, raw: &str) -> Result<bool, RecordError> {
        let spec = FIELDS
            .get(index)
            .ok_or_else(|| RecordError::UnknownField(format!("#{index}")))?;
        let value = spec.parse(raw)?;
        Ok(self.replace(index, value))
    }

    /// Replace a value by field name.
    pub fn set(&mut self, name: &str, value: FieldValue) -> Result<bool, RecordError> {
        let index = schema::field_index(name).ok_or_else(|| RecordError::UnknownField(name.to_string()))?;
        FIELDS[index].check(&value)?;
        Ok(self.replace(index, value))
    }

    /// Replace a value by field name, parsing user text.
    pub fn set_text(&mut self, name: &str, raw: &str) -> Result<bool, RecordError> {
        let index = schema::field_index(name).ok_or_else(|| RecordError::UnknownField(name.to_string()))?;
        self.set_from_text(index, raw)
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Collect the current values into a record.
    pub fn assemble(&self) -> Result<ClientRecord, RecordError> {
        ClientRecord::assemble(self.entries().map(|(spec, value)| (spec.name, value)))
    }

    fn replace(&mut self, index: usize, value: FieldValue) -> bool {
        match self.values.get_mut(index) {
            Some(slot) if *slot != value => {
                *slot = value;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idx(name: &str) -> usize {
        schema::field_index(name).unwrap()
    }

    #[test]
    fn starts_on_defaults_and_assembles() {
        let form = FormState::new();
        assert_eq!(form.entries().count(), 16);
        let record = form.assemble().unwrap();
        assert_eq!(record.age, 35);
        assert_eq!(record.job, "admin.");
        assert_eq!(record.campaign, 2);
    }

    #[test]
    fn categorical_adjust_wraps() {
        let mut form = FormState::new();
        let marital = idx("marital");
        assert!(form.adjust(marital, -1));
        assert_eq!(form.value(marital), Some(&FieldValue::Category("divorced".to_string())));
        assert!(form.adjust(marital, 1));
        assert_eq!(form.value(marital), Some(&FieldValue::Category("married".to_string())));
        assert!(form.adjust(marital, 4));
        assert_eq!(form.value(marital), Some(&FieldValue::Category("single".to_string())));
    }

    #[test]
    fn integer_adjust_saturates_at_bounds() {
        let mut form = FormState::new();
        let age = idx("age");
        assert!(form.adjust(age, 1_000));
        assert_eq!(form.value(age), Some(&FieldValue::Integer(100)));
        assert!(!form.adjust(age, 1));
        assert!(form.adjust(age, -1_000));
        assert_eq!(form.value(age), Some(&FieldValue::Integer(18)));

        let balance = idx("balance");
        form.set("balance", FieldValue::Integer(i64::MAX - 1)).unwrap();
        form.adjust(balance, 10);
        assert_eq!(form.value(balance), Some(&FieldValue::Integer(i64::MAX)));
    }

    #[test]
    fn rejected_text_keeps_previous_value() {
        let mut form = FormState::new();
        let duration = idx("duration");
        assert!(form.set_from_text(duration, "5001").is_err());
        assert!(form.set_from_text(duration, "abc").is_err());
        assert_eq!(form.value(duration), Some(&FieldValue::Integer(250)));

        assert_eq!(form.set_from_text(duration, "5000"), Ok(true));
        assert_eq!(form.set_from_text(duration, "5000"), Ok(false));
        assert_eq!(form.assemble().unwrap().duration, 5000);
    }

    #[test]
    fn set_by_name_checks_domain() {
        let mut form = FormState::new();
        assert!(form.set_text("month", "dec").unwrap());
        assert!(form.set_text("month", "december").is_err());
        assert!(form.set("nope", FieldValue::Integer(1)).is_err());
        assert_eq!(form.assemble().unwrap().month, "dec");
    }

    #[test]
    fn reset_restores_defaults() {
        let mut form = FormState::new();
        form.adjust(idx("job"), 3);
        form.set_text("pdays", "-1").unwrap();
        form.reset();
        assert_eq!(form, FormState::new());
    }
}
