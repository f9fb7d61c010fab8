use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Validation error: {field} is required and cannot be empty")]
    ValidationError { field: &'static str },

    #[error("Malformed line: expected {expected} fields, found {found}")]
    MalformedLineError { expected: usize, found: usize },

    #[error("Object not found: {key}")]
    ObjectNotFoundError { key: String },

    #[error("Failed to fetch object {key}: {message}")]
    ObjectFetchError { key: String, message: String },

    #[error("Failed to store object {key}: {message}")]
    ObjectStoreError { key: String, message: String },

    #[error("Persistence error: {message}")]
    PersistenceError { message: String },

    #[error("Invalid notification event: {message}")]
    EventError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid configuration value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Storage,
    Persistence,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl IngestError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ValidationError { .. }
            | Self::MalformedLineError { .. }
            | Self::EventError { .. } => ErrorCategory::Input,
            Self::ObjectNotFoundError { .. }
            | Self::ObjectFetchError { .. }
            | Self::ObjectStoreError { .. } => ErrorCategory::Storage,
            Self::PersistenceError { .. } => ErrorCategory::Persistence,
            Self::TomlError(_)
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            Self::IoError(_) | Self::SerializationError(_) | Self::CsvError(_) => {
                ErrorCategory::System
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // Recovered per line; never fatal to a batch.
            Self::ValidationError { .. } | Self::MalformedLineError { .. } => ErrorSeverity::Low,
            Self::ObjectFetchError { .. }
            | Self::ObjectStoreError { .. }
            | Self::PersistenceError { .. } => ErrorSeverity::Medium,
            Self::ObjectNotFoundError { .. } | Self::EventError { .. } => ErrorSeverity::High,
            _ => ErrorSeverity::Critical,
        }
    }

    /// Whether redelivering the same notification could succeed.
    pub fn is_retryable(&self) -> bool {
        self.severity() == ErrorSeverity::Medium
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Self::ObjectNotFoundError { .. } => 404,
            Self::ObjectFetchError { .. } | Self::PersistenceError { .. } => 502,
            _ if self.category() == ErrorCategory::Input => 400,
            _ => 500,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Input if matches!(self, Self::EventError { .. }) => {
                "Check the notification payload carries Records[].s3.object.key"
            }
            ErrorCategory::Input => {
                "Check that each line has 5 comma-separated fields with documento and nombre"
            }
            ErrorCategory::Storage if matches!(self, Self::ObjectNotFoundError { .. }) => {
                "Verify the object key exists in the configured bucket"
            }
            ErrorCategory::Storage => "Check bucket permissions and network connectivity, then retry",
            ErrorCategory::Persistence => "Check the people table exists and is writable, then retry",
            ErrorCategory::Configuration => "Review the configuration file and environment variables",
            ErrorCategory::System => "Check local file permissions and available disk space",
        }
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;
