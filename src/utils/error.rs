use thiserror::Error;

#[derive(Error, Debug)]
pub enum SplitError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("OCR request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Recognition failed: {message}")]
    RecognitionError { message: String },

    #[error("An upload is already being processed")]
    UploadInProgress,

    #[error("Upload was cancelled")]
    UploadCancelled,

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Recognition,
    Upload,
    Configuration,
    Export,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SplitError {
    pub fn recognition(message: impl Into<String>) -> Self {
        Self::RecognitionError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::HttpError(_) | Self::RecognitionError { .. } => ErrorCategory::Recognition,
            Self::UploadInProgress | Self::UploadCancelled => ErrorCategory::Upload,
            Self::ConfigValidationError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            Self::ZipError(_)
            | Self::CsvError(_)
            | Self::IoError(_)
            | Self::SerializationError(_) => ErrorCategory::Export,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 取消或重複上傳只是提示，不影響已有的帳單
            ErrorCategory::Upload => ErrorSeverity::Low,
            ErrorCategory::Recognition => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Export => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::HttpError(_) => "Check that the OCR endpoint is reachable and try the upload again",
            Self::RecognitionError { .. } => {
                "Try a sharper photo of the menu, or pass pre-recognized text with --recognizer text"
            }
            Self::UploadInProgress => "Wait for the current upload to finish or cancel it first",
            Self::UploadCancelled => "Start a new upload when ready",
            Self::ConfigValidationError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. } => {
                "Review the session file and command-line flags"
            }
            Self::ZipError(_) | Self::CsvError(_) | Self::SerializationError(_) => {
                "Export failed; the summary printed above is still valid"
            }
            Self::IoError(_) => "Check that the paths exist and are writable",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Recognition => format!("Could not read the menu: {}", self),
            ErrorCategory::Upload => self.to_string(),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Export => format!("Could not write the bill: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, SplitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_errors_are_low_severity() {
        assert_eq!(SplitError::UploadInProgress.severity(), ErrorSeverity::Low);
        assert_eq!(SplitError::UploadCancelled.category(), ErrorCategory::Upload);
    }

    #[test]
    fn test_recognition_error_message() {
        let err = SplitError::recognition("tesseract exited with status 1");
        assert_eq!(err.category(), ErrorCategory::Recognition);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err
            .user_friendly_message()
            .contains("tesseract exited with status 1"));
    }

    #[test]
    fn test_config_errors_share_category() {
        let err = SplitError::InvalidConfigValueError {
            field: "bill.tax_rate_percent".to_string(),
            value: "NaN".to_string(),
            reason: "must be finite".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity(), ErrorSeverity::High);
    }
}
