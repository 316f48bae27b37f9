use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("{service} returned HTTP {status} for {url}")]
    UpstreamError {
        service: String,
        status: u16,
        url: String,
    },

    #[error("EDHREC build ID detection failed: {message}")]
    BuildIdError { message: String },

    #[error("{service} sent unusable data: {message}")]
    UpstreamDataError { service: String, message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Upstream,
    Storage,
    Configuration,
    Data,
    Validation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AnalyzerError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AnalyzerError::ApiError(_) => ErrorCategory::Network,
            AnalyzerError::UpstreamError { .. }
            | AnalyzerError::BuildIdError { .. }
            | AnalyzerError::UpstreamDataError { .. } => ErrorCategory::Upstream,
            AnalyzerError::IoError(_) => ErrorCategory::Storage,
            AnalyzerError::ConfigError { .. }
            | AnalyzerError::ConfigValidationError { .. }
            | AnalyzerError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            AnalyzerError::CsvError(_)
            | AnalyzerError::SerializationError(_)
            | AnalyzerError::ProcessingError { .. } => ErrorCategory::Data,
            AnalyzerError::ValidationError { .. } => ErrorCategory::Validation,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // upstream hiccups usually clear up on a later run
            ErrorCategory::Network | ErrorCategory::Upstream => ErrorSeverity::Medium,
            ErrorCategory::Data | ErrorCategory::Validation => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    /// True when the failure came from EDHREC or Scryfall rather than from us.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Network | ErrorCategory::Upstream
        )
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            AnalyzerError::ApiError(_) => "Could not reach EDHREC or Scryfall".to_string(),
            AnalyzerError::UpstreamError {
                service, status, ..
            } => format!("{} answered with HTTP {}", service, status),
            AnalyzerError::BuildIdError { .. } => {
                "Could not detect the current EDHREC site build".to_string()
            }
            AnalyzerError::IoError(e) => format!("File system error: {}", e),
            AnalyzerError::UpstreamDataError { service, .. } => {
                format!("{} returned data in an unexpected format", service)
            }
            AnalyzerError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check your internet connection and try again",
            ErrorCategory::Upstream => {
                "Check the commander name spelling; EDHREC may also be rate limiting, retry later"
            }
            ErrorCategory::Storage => "Check that the cache and output directories are writable",
            ErrorCategory::Configuration => "Review the command line flags and settings file",
            ErrorCategory::Data => "Clear the cache directory and run again",
            ErrorCategory::Validation => "Fix the request parameters and try again",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_errors_are_retryable_severity() {
        let err = AnalyzerError::UpstreamError {
            service: "EDHREC".to_string(),
            status: 404,
            url: "https://json.edhrec.com/pages/decks/nobody.json".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Upstream);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.is_upstream());
        assert_eq!(err.user_friendly_message(), "EDHREC answered with HTTP 404");
    }

    #[test]
    fn test_validation_errors_are_not_upstream() {
        let err = AnalyzerError::ValidationError {
            message: "commander cannot be empty".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert!(!err.is_upstream());
        assert_eq!(err.severity(), ErrorSeverity::High);
    }

    #[test]
    fn test_malformed_upstream_data_is_upstream() {
        let err = AnalyzerError::UpstreamDataError {
            service: "EDHREC".to_string(),
            message: "Deck abc has an invalid savedate 'soon'".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Upstream);
        assert!(err.is_upstream());
        assert_eq!(
            err.user_friendly_message(),
            "EDHREC returned data in an unexpected format"
        );
    }

    #[test]
    fn test_io_errors_are_critical() {
        let err = AnalyzerError::from(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }
}
