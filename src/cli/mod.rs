//! Command-line parsing for the deposit predictor.
//!
//! The goal of this module is to keep **argument parsing** separate from form
//! handling and scoring.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "deposit", version, about = "Long-term investor (term deposit) predictor")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Model artifact directory (containing model.json) or JSON file.
    #[arg(long, global = true, value_name = "PATH")]
    pub model: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Append logs to this file (the TUI logs nowhere otherwise).
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive form.
    Tui,
    /// Score one client record without the form.
    ///
    /// Starts from the form defaults, applies `--record`, then each `--set`.
    Predict(PredictArgs),
    /// Print the input fields with their labels, defaults and domains.
    Schema,
}

#[derive(Debug, Parser, Clone)]
pub struct PredictArgs {
    /// Override one input, e.g. `--set job=management --set age=42`.
    #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
    pub set: Vec<(String, String)>,

    /// JSON object with some or all record fields.
    #[arg(long, value_name = "JSON")]
    pub record: Option<PathBuf>,

    /// Print the record and prediction as JSON.
    #[arg(long)]
    pub json: bool,
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    let (field, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got '{raw}'"))?;
    let field = field.trim();
    if field.is_empty() {
        return Err(format!("missing field name in '{raw}'"));
    }
    Ok((field.to_string(), value.trim().to_string()))
}
