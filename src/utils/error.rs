use thiserror::Error;

#[derive(Error, Debug)]
pub enum OrderError {
    #[error("Persistence error: {message}")]
    PersistenceError { message: String },

    #[error("Remote service error: {message}")]
    ServiceError { message: String },

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration value: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid configuration value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

/// 錯誤嚴重程度，CLI 以此決定退出碼
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl OrderError {
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::PersistenceError {
            message: message.into(),
        }
    }

    pub fn service(message: impl Into<String>) -> Self {
        Self::ServiceError {
            message: message.into(),
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ServiceError { .. } | Self::HttpError(_) => ErrorSeverity::Medium,
            Self::PersistenceError { .. }
            | Self::CsvError(_)
            | Self::SerializationError(_)
            | Self::ValidationError { .. } => ErrorSeverity::High,
            Self::IoError(_)
            | Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorSeverity::Critical,
        }
    }

    /// 給終端使用者看的簡短訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::PersistenceError { message } => format!("Order store unavailable: {}", message),
            Self::ServiceError { .. } | Self::HttpError(_) => {
                "Remote order service could not be reached".to_string()
            }
            Self::CsvError(_) | Self::IoError(_) => {
                format!("Report could not be written: {}", self)
            }
            Self::SerializationError(_) => "Order data is malformed".to_string(),
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. } => {
                format!("Configuration problem: {}", self)
            }
            Self::ValidationError { message } => format!("Invalid order data: {}", message),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, OrderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_are_critical() {
        let err = OrderError::MissingConfigError {
            field: "service.endpoint".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.exit_code(), 3);
        assert!(err.user_friendly_message().contains("service.endpoint"));
    }

    #[test]
    fn test_every_error_exits_non_zero() {
        let errors = vec![
            OrderError::persistence("store locked"),
            OrderError::service("timeout"),
            OrderError::IoError(std::io::Error::other("disk full")),
            OrderError::ConfigError {
                message: "bad toml".to_string(),
            },
            OrderError::InvalidConfigValueError {
                field: "rules.payload_threshold".to_string(),
                value: "-1".to_string(),
                reason: "must be non-negative".to_string(),
            },
            OrderError::ValidationError {
                message: "amount is NaN".to_string(),
            },
        ];

        for err in errors {
            assert_ne!(err.exit_code(), 0, "{} exited with 0", err);
        }
    }

    #[test]
    fn test_service_errors_are_retryable() {
        let err = OrderError::service("connection refused");
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert_eq!(err.to_string(), "Remote service error: connection refused");
    }
}
