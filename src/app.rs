//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves configuration and starts logging
//! - loads the model artifact once (fatal on failure)
//! - hands the model to the chosen front-end

use clap::Parser;
use tracing::error;

use crate::cli::{Cli, Command, PredictArgs};
use crate::config::AppConfig;
use crate::error::{AppError, EXIT_RUNTIME};
use crate::logging::{LogTarget, init_logger};
use crate::model::{Classifier, DepositModel};
use crate::report::PredictionReport;

pub mod pipeline;

/// Entry point for the `deposit` binary.
pub fn run() -> Result<(), AppError> {
    // `deposit` and `deposit --model DIR` behave like `deposit tui ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = Cli::parse_from(argv);
    let config = AppConfig::from_cli(&cli);

    init_logger(config.verbose, &log_target(&cli.command, &config))?;

    match cli.command {
        Command::Schema => {
            print!("{}", crate::report::format_schema());
            Ok(())
        }
        Command::Predict(args) => {
            let model = load_model(&config)?;
            handle_predict(&model, &args)
        }
        Command::Tui => {
            let model = load_model(&config)?;
            crate::tui::run(&model)
        }
    }
}

fn log_target(command: &Command, config: &AppConfig) -> LogTarget {
    match (&config.log_file, command) {
        (Some(path), _) => LogTarget::File(path.clone()),
        (None, Command::Tui) => LogTarget::Off,
        (None, _) => LogTarget::Stderr,
    }
}

fn load_model(config: &AppConfig) -> Result<DepositModel, AppError> {
    DepositModel::load(&config.model_path).map_err(|e| {
        error!(path = %config.model_path.display(), "model load failed: {e}");
        AppError::from(e)
    })
}

fn handle_predict(model: &DepositModel, args: &PredictArgs) -> Result<(), AppError> {
    let form = pipeline::build_form(args.record.as_deref(), &args.set)?;
    let run = pipeline::run_prediction(model, &form)?;

    if args.json {
        let report = PredictionReport::new(model.name(), &run.record, &run.prediction);
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Failed to encode prediction: {e}")))?;
        println!("{json}");
    } else {
        println!("{}", crate::report::format_prediction(&run.prediction));
    }
    Ok(())
}

/// Rewrite argv so `deposit` defaults to `deposit tui`.
///
/// Rules:
/// - `deposit`                      -> `deposit tui`
/// - `deposit --model DIR ...`      -> `deposit tui --model DIR ...`
/// - `deposit -v predict ...`       -> unchanged (global flag before a subcommand)
/// - `deposit --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    // Global flags may come before an explicit subcommand.
    let has_subcommand = argv[1..]
        .iter()
        .any(|a| matches!(a.as_str(), "tui" | "predict" | "schema"));
    if has_subcommand {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    argv
}
