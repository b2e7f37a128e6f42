//! Runtime configuration.
//!
//! The model location comes from `--model`, then `DEPOSIT_MODEL_PATH`
//! (a `.env` file in the working directory is honoured), then `saved_model`.

use std::path::PathBuf;

use crate::cli::Cli;

pub const DEFAULT_MODEL_DIR: &str = "saved_model";
pub const MODEL_PATH_ENV: &str = "DEPOSIT_MODEL_PATH";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub model_path: PathBuf,
    pub verbose: bool,
    pub log_file: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_cli(cli: &Cli) -> Self {
        dotenvy::dotenv().ok();
        let env_path = std::env::var(MODEL_PATH_ENV).ok();
        Self {
            model_path: resolve_model_path(cli.model.clone(), env_path),
            verbose: cli.verbose,
            log_file: cli.log_file.clone(),
        }
    }
}

fn resolve_model_path(flag: Option<PathBuf>, env: Option<String>) -> PathBuf {
    flag.or_else(|| env.filter(|v| !v.trim().is_empty()).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_wins_over_env() {
        let path = resolve_model_path(Some(PathBuf::from("a")), Some("b".to_string()));
        assert_eq!(path, PathBuf::from("a"));
    }

    #[test]
    fn env_used_when_no_flag() {
        assert_eq!(resolve_model_path(None, Some("models/v2".to_string())), PathBuf::from("models/v2"));
    }

    #[test]
    fn blank_env_falls_back_to_default() {
        assert_eq!(resolve_model_path(None, Some("  ".to_string())), PathBuf::from(DEFAULT_MODEL_DIR));
        assert_eq!(resolve_model_path(None, None), PathBuf::from(DEFAULT_MODEL_DIR));
    }
}
