use thiserror::Error;

/// Raised while loading the dataset: a required column is absent or a value
/// cannot be coerced to its declared type. Fatal to startup.
///
/// CSV errors carry the 1-based physical line; `InvalidRow` comes from
/// already-typed rows and carries their 0-based index.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataFormatError {
    #[error("missing required column `{column}`")]
    MissingColumn { column: &'static str },

    #[error("line {line}: invalid `{column}` value '{value}' (expected {expected})")]
    InvalidValue {
        line: usize,
        column: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("row {row}: invalid `{column}` value '{value}' (expected {expected})")]
    InvalidRow {
        row: usize,
        column: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("line {line}: CSV parse error: {message}")]
    Csv { line: usize, message: String },

    #[error("dataset contains no rows")]
    Empty,
}

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

impl From<DataFormatError> for AppError {
    fn from(err: DataFormatError) -> Self {
        let exit_code = match err {
            DataFormatError::Empty => 3,
            _ => 2,
        };
        AppError::new(exit_code, format!("Data format error: {err}"))
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
