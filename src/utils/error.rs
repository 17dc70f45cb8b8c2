use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackfillError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("API returned HTTP {status} for {url}")]
    HttpStatusError { status: u16, url: String },

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl BackfillError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            BackfillError::ApiError(_) | BackfillError::HttpStatusError { .. } => {
                ErrorSeverity::Medium
            }
            BackfillError::IoError(_) => ErrorSeverity::Critical,
            BackfillError::UrlError(_)
            | BackfillError::MissingConfigError { .. }
            | BackfillError::InvalidConfigValueError { .. }
            | BackfillError::ConfigValidationError { .. }
            | BackfillError::CsvError(_)
            | BackfillError::SerializationError(_)
            | BackfillError::ProcessingError { .. } => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            BackfillError::ApiError(_) | BackfillError::HttpStatusError { .. } => {
                "Check network access to the catalog API and retry later"
            }
            BackfillError::UrlError(_) => "Check --catalog-url and the endpoint paths",
            BackfillError::IoError(_) => "Check that the cache directory exists and is writable",
            BackfillError::SerializationError(_) | BackfillError::ProcessingError { .. } => {
                "The cached or downloaded data may be corrupt; rerun with --force"
            }
            BackfillError::CsvError(_) => "Try a different --format",
            BackfillError::MissingConfigError { .. }
            | BackfillError::InvalidConfigValueError { .. }
            | BackfillError::ConfigValidationError { .. } => {
                "Review the command-line flags and configuration file"
            }
        }
    }

    /// Process exit code for a failed run, never 0.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, BackfillError>;
