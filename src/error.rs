use crate::domain::RecordError;
use crate::model::ModelError;

/// Exit code for bad usage or input outside its declared domain.
pub const EXIT_INPUT: u8 = 2;
/// Exit code for a missing or incompatible model artifact.
pub const EXIT_MODEL: u8 = 3;
/// Exit code for terminal and other runtime I/O failures.
pub const EXIT_RUNTIME: u8 = 4;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<RecordError> for AppError {
    fn from(err: RecordError) -> Self {
        Self::new(EXIT_INPUT, format!("Invalid client record: {err}"))
    }
}

impl From<ModelError> for AppError {
    fn from(err: ModelError) -> Self {
        // A malformed record only reaches the model through a caller bug or a
        // hand-edited record file; everything else is an artifact problem.
        let code = match err {
            ModelError::Record(_) => EXIT_INPUT,
            _ => EXIT_MODEL,
        };
        Self::new(code, err.to_string())
    }
}
