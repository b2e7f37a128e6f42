//! Domain types shared by the form, the CLI and the model.
//!
//! This module defines:
//!
//! - the enumerated field schema (`FieldSpec`, `Domain`, `FIELDS`)
//! - the fixed-schema `ClientRecord` and its assembly/validation
//! - the record-level error type (`RecordError`)

pub mod record;
pub mod schema;

pub use record::*;
pub use schema::*;
