/// Error types for the translation pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslateError {
    /// Invalid or missing configuration (credential, conflicting flags, empty language list)
    ConfigError(String),
    /// Input file is not valid JSON or not a nested string tree
    InvalidJson(String),
    /// A filename or option did not carry a recognized ISO 639-1 code
    UnknownLanguage(String),
    /// The generative backend signalled failure for one batch
    BatchFailed(String),
    /// HTTP-level failure while talking to the backend
    NetworkError(String),
    /// Filesystem failure while reading or writing a localization file
    IoError(String),
}

impl std::fmt::Display for TranslateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranslateError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            TranslateError::InvalidJson(msg) => write!(f, "Invalid JSON: {}", msg),
            TranslateError::UnknownLanguage(msg) => write!(f, "Unknown language: {}", msg),
            TranslateError::BatchFailed(msg) => write!(f, "Batch failed: {}", msg),
            TranslateError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            TranslateError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for TranslateError {}

impl From<reqwest::Error> for TranslateError {
    fn from(err: reqwest::Error) -> Self {
        TranslateError::NetworkError(err.to_string())
    }
}

impl From<std::io::Error> for TranslateError {
    fn from(err: std::io::Error) -> Self {
        TranslateError::IoError(err.to_string())
    }
}

/// Result type for translation operations
pub type TranslateResult<T> = Result<T, TranslateError>;
