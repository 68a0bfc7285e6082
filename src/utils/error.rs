use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("{service} returned status {status}: {message}")]
    UpstreamError {
        service: String,
        status: String,
        message: String,
    },

    #[error("Movie {id} is already a favourite")]
    DuplicateFavourite { id: u64 },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Timeout,
    Upstream,
    Storage,
    Configuration,
    Input,
}

impl AppError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AppError::ApiError(e) if e.is_timeout() => ErrorCategory::Timeout,
            AppError::ApiError(e) if e.is_status() || e.is_decode() => ErrorCategory::Upstream,
            // 請求組不起來（例如 URL 不合法）不是連線問題
            AppError::ApiError(e) if e.is_builder() => ErrorCategory::Configuration,
            AppError::ApiError(_) => ErrorCategory::Network,
            AppError::UpstreamError { .. } => ErrorCategory::Upstream,
            AppError::IoError(_) | AppError::SerializationError(_) => ErrorCategory::Storage,
            AppError::ConfigError { .. }
            | AppError::ConfigValidationError { .. }
            | AppError::InvalidConfigValueError { .. }
            | AppError::MissingConfigError { .. } => ErrorCategory::Configuration,
            AppError::DuplicateFavourite { .. } | AppError::ValidationError { .. } => {
                ErrorCategory::Input
            }
        }
    }

    /// 把所有錯誤壓平成畫面上顯示的一行訊息
    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Timeout => "Request timed out. Please try again later.".to_string(),
            ErrorCategory::Network => format!(
                "Network error: {}. Please check your internet connection.",
                self
            ),
            _ => format!("Something went wrong: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check your internet connection and try again",
            ErrorCategory::Timeout => "Try again later or raise tmdb.timeout_seconds",
            ErrorCategory::Upstream => "Verify the API keys and base URLs in the config file",
            ErrorCategory::Storage => "Check that the data directory is writable",
            ErrorCategory::Configuration => "Fix the config file or pass --config",
            ErrorCategory::Input => "Check the command arguments",
        }
    }

    /// 依錯誤類別決定程式結束碼
    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Configuration => 3,
            ErrorCategory::Input => 4,
            ErrorCategory::Storage => 5,
            ErrorCategory::Network | ErrorCategory::Timeout | ErrorCategory::Upstream => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_error_is_flattened_to_generic_message() {
        let err = AppError::UpstreamError {
            service: "places".to_string(),
            status: "REQUEST_DENIED".to_string(),
            message: "The provided API key is invalid.".to_string(),
        };

        assert_eq!(err.category(), ErrorCategory::Upstream);
        assert_eq!(
            err.user_friendly_message(),
            "Something went wrong: places returned status REQUEST_DENIED: The provided API key is invalid."
        );
    }

    #[test]
    fn test_config_errors_share_exit_code() {
        let missing = AppError::MissingConfigError {
            field: "tmdb.api_key".to_string(),
        };
        let invalid = AppError::InvalidConfigValueError {
            field: "places.radius_meters".to_string(),
            value: "0".to_string(),
            reason: "Value must be between 1 and 50000".to_string(),
        };

        assert_eq!(missing.exit_code(), 3);
        assert_eq!(invalid.exit_code(), 3);
    }

    #[test]
    fn test_request_builder_error_is_not_a_network_error() {
        let builder_error = reqwest::Client::new()
            .get("not a url")
            .build()
            .unwrap_err();
        assert!(builder_error.is_builder());

        let err = AppError::from(builder_error);
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert!(err.user_friendly_message().starts_with("Something went wrong: "));
        assert!(!err.user_friendly_message().contains("internet connection"));
    }

    #[test]
    fn test_duplicate_favourite_message() {
        let err = AppError::DuplicateFavourite { id: 550 };
        assert_eq!(err.to_string(), "Movie 550 is already a favourite");
        assert_eq!(err.category(), ErrorCategory::Input);
    }
}
