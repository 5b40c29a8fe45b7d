//! Error types for reqgate

use thiserror::Error;

/// Result type alias for reqgate operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the application
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// The API error behind this error, if any.
    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            Error::Api(err) => Some(err),
            _ => None,
        }
    }
}

/// Errors from calling the restlet, classified for the caller.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("NetSuite restlet is not configured yet.")]
    NotConfigured,

    #[error("{0}")]
    InvalidArgument(String),

    #[error("NetSuite is unavailable: {0}")]
    Unavailable(String),

    #[error("NetSuite error ({status}): {body}")]
    Upstream { status: u16, body: String },

    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Invalid response from NetSuite: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Unavailable(format!("request timed out: {}", err))
        } else if err.is_connect() {
            ApiError::Unavailable(format!("failed to connect: {}", err))
        } else {
            ApiError::Unavailable(err.to_string())
        }
    }
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("NETSUITE_RESTLET_URL is not set")]
    MissingEndpoint,

    #[error("Invalid NETSUITE_RESTLET_URL: {0}")]
    InvalidEndpoint(String),

    #[error("NetSuite OAuth credentials are missing: {}", .0.join(", "))]
    MissingCredentials(Vec<&'static str>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_configured_message() {
        let err = ApiError::NotConfigured;
        assert!(err.to_string().contains("not configured"));
    }

    #[test]
    fn test_upstream_message_keeps_status_and_body() {
        let err = ApiError::Upstream {
            status: 500,
            body: "internal error".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("500"));
        assert!(msg.contains("internal error"));
    }

    #[test]
    fn test_invalid_argument_is_verbatim() {
        let err = ApiError::InvalidArgument("itemId is required".to_string());
        assert_eq!(err.to_string(), "itemId is required");
    }

    #[test]
    fn test_unknown_action() {
        let err = ApiError::UnknownAction("widgets".to_string());
        assert!(err.to_string().contains("widgets"));
    }

    #[test]
    fn test_missing_credentials_lists_keys() {
        let err = ConfigError::MissingCredentials(vec!["NETSUITE_TOKEN_ID", "NETSUITE_TOKEN_SECRET"]);
        let msg = err.to_string();
        assert!(msg.contains("NETSUITE_TOKEN_ID, NETSUITE_TOKEN_SECRET"));
    }

    #[test]
    fn test_error_from_api_error() {
        let err: Error = ApiError::NotConfigured.into();

        match err {
            Error::Api(ApiError::NotConfigured) => (),
            _ => panic!("Expected Error::Api(ApiError::NotConfigured)"),
        }
    }

    #[test]
    fn test_as_api() {
        let err: Error = ApiError::Cancelled.into();
        assert!(matches!(err.as_api(), Some(ApiError::Cancelled)));

        let err = Error::Io(std::io::Error::other("nope"));
        assert!(err.as_api().is_none());
    }

    #[test]
    fn test_error_from_config_error() {
        let err: Error = ConfigError::MissingEndpoint.into();

        match err {
            Error::Config(ConfigError::MissingEndpoint) => (),
            _ => panic!("Expected Error::Config(ConfigError::MissingEndpoint)"),
        }
    }
}
