use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Download of {url} failed with HTTP status {status}")]
    DownloadStatusError { url: String, status: u16 },

    #[error("Downloaded content is not a PDF: {reason}")]
    InvalidPdfError { reason: String },

    #[error("PDF parsing failed: {message}")]
    PdfParseError { message: String },

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Input,
    Processing,
    Storage,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PipelineError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::HttpError(_) | Self::DownloadStatusError { .. } => ErrorCategory::Network,
            Self::InvalidPdfError { .. } | Self::PdfParseError { .. } => ErrorCategory::Input,
            Self::ZipError(_) | Self::IoError(_) => ErrorCategory::Storage,
            Self::CsvError(_) | Self::SerializationError(_) | Self::ProcessingError { .. } => {
                ErrorCategory::Processing
            }
            Self::TomlError(_)
            | Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 網路錯誤通常重試即可
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::Processing => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    /// 是否值得重新下載
    pub fn is_retryable(&self) -> bool {
        match self {
            // 傳輸層錯誤可重試；重新導向與建構錯誤不行
            Self::HttpError(e) => {
                !e.is_redirect()
                    && !e.is_builder()
                    && (e.is_timeout()
                        || e.is_connect()
                        || e.is_request()
                        || e.is_body()
                        || e.is_decode())
            }
            Self::DownloadStatusError { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::HttpError(_) => "Check your network connection and that the URL is reachable",
            Self::DownloadStatusError { .. } => {
                "Verify the PDF URL; the server refused or could not serve it"
            }
            Self::InvalidPdfError { .. } => {
                "Make sure the URL points directly at a PDF file, not an HTML landing page"
            }
            Self::PdfParseError { .. } => {
                "The PDF may be encrypted or damaged; try another copy of the document"
            }
            Self::ZipError(_) | Self::IoError(_) => {
                "Check that the output directory exists and is writable"
            }
            Self::CsvError(_) | Self::SerializationError(_) | Self::ProcessingError { .. } => {
                "Re-run with --verbose and report the log if the problem persists"
            }
            Self::TomlError(_) => "Fix the syntax of the TOML configuration file",
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                "Review the configuration values shown above"
            }
            Self::MissingConfigError { .. } => {
                "Provide the missing value on the command line or in the config file"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::HttpError(_) => format!("Could not download the PDF: {}", self),
            Self::DownloadStatusError { status, .. } => {
                format!("The server answered with HTTP {} for the PDF", status)
            }
            Self::InvalidPdfError { .. } | Self::PdfParseError { .. } => {
                format!("The document could not be read: {}", self)
            }
            Self::MissingConfigError { field } => {
                format!("Missing setting '{}'", field)
            }
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            _ => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_errors_are_network_and_retryable_only_for_server_side() {
        let unavailable = PipelineError::DownloadStatusError {
            url: "https://example.com/a.pdf".to_string(),
            status: 503,
        };
        assert_eq!(unavailable.category(), ErrorCategory::Network);
        assert_eq!(unavailable.severity(), ErrorSeverity::Medium);
        assert!(unavailable.is_retryable());

        let throttled = PipelineError::DownloadStatusError {
            url: "https://example.com/a.pdf".to_string(),
            status: 429,
        };
        assert!(throttled.is_retryable());

        let missing = PipelineError::DownloadStatusError {
            url: "https://example.com/a.pdf".to_string(),
            status: 404,
        };
        assert!(!missing.is_retryable());
    }

    #[test]
    fn test_config_errors_are_high_severity() {
        let err = PipelineError::InvalidConfigValueError {
            field: "wordcloud.width".to_string(),
            value: "0".to_string(),
            reason: "Value must be at least 1".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert_eq!(
            err.user_friendly_message(),
            "Setting 'wordcloud.width' is invalid: Value must be at least 1"
        );
    }

    #[test]
    fn test_io_errors_are_critical() {
        let err = PipelineError::from(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        assert_eq!(err.category(), ErrorCategory::Storage);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(!err.is_retryable());
    }
}
