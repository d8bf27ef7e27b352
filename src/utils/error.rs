use thiserror::Error;

#[derive(Error, Debug)]
pub enum SlaError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid ticket at row {row}: {reason}")]
    InvalidTicketError { row: usize, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Input,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SlaError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SlaError::IoError(_) => ErrorCategory::Io,
            SlaError::CsvError(_)
            | SlaError::SerializationError(_)
            | SlaError::InvalidTicketError { .. } => ErrorCategory::Input,
            SlaError::TomlError(_)
            | SlaError::ConfigError { .. }
            | SlaError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            SlaError::IoError(_) => "Check that the file exists and is readable",
            SlaError::CsvError(_) => {
                "Make sure the ticket export has the header id,created_at,closed_at,urgency"
            }
            SlaError::InvalidTicketError { .. } => {
                "Fix the offending row; timestamps must be RFC 3339 (e.g. 2024-03-04T09:00:00Z)"
            }
            SlaError::SerializationError(_) => "Report this as a bug",
            SlaError::TomlError(_) => "Check the configuration file syntax",
            SlaError::ConfigError { .. } | SlaError::InvalidConfigValueError { .. } => {
                "Correct the configuration value or remove it to use the default"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Io => format!("Could not access a file: {}", self),
            ErrorCategory::Input => format!("The ticket data could not be read: {}", self),
            ErrorCategory::Configuration => format!("The configuration is invalid: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, SlaError>;
