//! Error types and handling for `Placecast`

use thiserror::Error;

/// Stable error codes surfaced to callers of the facade and the HTTP API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    InvalidInput,
    UpstreamHttp,
    UpstreamStatus,
    NoMatch,
    Config,
}

impl ErrorCode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidInput => "invalid-input",
            ErrorCode::UpstreamHttp => "upstream-http-error",
            ErrorCode::UpstreamStatus => "upstream-status-error",
            ErrorCode::NoMatch => "no-match",
            ErrorCode::Config => "config-error",
        }
    }

    /// Whether the failure belongs to the "upstream unavailable" family
    #[must_use]
    pub fn is_upstream(self) -> bool {
        matches!(self, ErrorCode::UpstreamHttp | ErrorCode::UpstreamStatus)
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Main error type for the `Placecast` library
#[derive(Error, Debug, Clone)]
pub enum PlacecastError {
    /// Blank or malformed query or coordinates, rejected before any network call
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// Transport failure, non-2xx response or undecodable payload from a provider
    #[error("Upstream HTTP error from {provider}: {message}")]
    UpstreamHttp { provider: String, message: String },

    /// Provider answered 200 but reported a non-OK status
    #[error("Upstream status {status}{}", .message.as_ref().map(|m| format!(": {m}")).unwrap_or_default())]
    UpstreamStatus {
        status: String,
        message: Option<String>,
    },

    /// Well-formed request without any usable candidate
    #[error("No match for '{query}'")]
    NoMatch { query: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl PlacecastError {
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn upstream_http<P: Into<String>, S: Into<String>>(provider: P, message: S) -> Self {
        Self::UpstreamHttp {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn upstream_status<S: Into<String>>(status: S, message: Option<String>) -> Self {
        Self::UpstreamStatus {
            status: status.into(),
            message,
        }
    }

    pub fn no_match<S: Into<String>>(query: S) -> Self {
        Self::NoMatch {
            query: query.into(),
        }
    }

    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            PlacecastError::InvalidInput { .. } => ErrorCode::InvalidInput,
            PlacecastError::UpstreamHttp { .. } => ErrorCode::UpstreamHttp,
            PlacecastError::UpstreamStatus { .. } => ErrorCode::UpstreamStatus,
            PlacecastError::NoMatch { .. } => ErrorCode::NoMatch,
            PlacecastError::Config { .. } => ErrorCode::Config,
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            PlacecastError::InvalidInput { message } => format!("Invalid input: {message}"),
            PlacecastError::UpstreamHttp { .. } => {
                "Unable to reach the weather or geocoding service. Please try again later."
                    .to_string()
            }
            PlacecastError::UpstreamStatus { status, .. } => {
                format!("The geocoding service refused the request ({status}).")
            }
            PlacecastError::NoMatch { query } => format!("No places found for '{query}'."),
            PlacecastError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
        }
    }
}
