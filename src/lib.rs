//! `deposit-predictor` library crate.
//!
//! The binary (`deposit`) is a thin wrapper around this library so that:
//!
//! - form handling and scoring are testable without a terminal
//! - the same schema drives the TUI, the CLI and record validation

pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod form;
pub mod logging;
pub mod model;
pub mod report;
pub mod tui;
