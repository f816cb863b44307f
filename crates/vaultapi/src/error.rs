//! Error types for Vault API calls.
//!
//! Errors are categorized so the CLI can print a short hint next to the raw
//! failure detail. No category is retried: every failure ends the run.

use crate::types::Method;
use std::fmt;

/// Result type alias for Vault API operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Categories of API errors for user feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Token missing, expired, or lacking capabilities (401/403).
    Auth,
    /// Path does not exist on the server (404).
    NotFound,
    /// Server-side failure (5xx).
    Server,
    /// Connection, DNS, or TLS problems before a status was received.
    Network,
    /// Response body could not be parsed.
    Format,
    /// Client configuration is unusable.
    Config,
    /// Any other rejected request (400, 405, ...).
    Other,
}

impl ErrorCategory {
    /// Get a user-friendly description of this error category.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Auth => "Permission denied",
            Self::NotFound => "Path not found",
            Self::Server => "Server error",
            Self::Network => "Network connectivity issue",
            Self::Format => "Malformed response",
            Self::Config => "Invalid configuration",
            Self::Other => "Request rejected",
        }
    }

    /// Get actionable advice for resolving this error category.
    #[must_use]
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Auth => "Check that the token is valid and its policies allow this path",
            Self::NotFound => "Verify the mount or resource exists on the target server",
            Self::Server => "Check the server logs; the server may be sealed or unhealthy",
            Self::Network => "Check the server address and that it is reachable",
            Self::Format => "The server did not return JSON; verify the address points at the API",
            Self::Config => "Provide --url and --token, or set them in the settings file",
            Self::Other => "Check the error body for the server's explanation",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Errors that can occur while talking to the Vault API.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The server answered with a status that was not accepted.
    #[error("{method} {path} returned status {status}: {body}")]
    Remote {
        /// HTTP method of the failed request.
        method: Method,
        /// API path of the failed request.
        path: String,
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// The response body was not valid JSON.
    #[error("malformed response from {path}: {message}")]
    MalformedResponse {
        /// API path of the request.
        path: String,
        /// Parser message.
        message: String,
    },

    /// The request never produced an HTTP response.
    #[error("transport error: {message}")]
    Transport {
        /// Underlying error message.
        message: String,
    },

    /// Client configuration is invalid.
    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl Error {
    /// Create a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// HTTP status code, if the server answered.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Get the category of this error.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Remote { status, .. } => match status {
                401 | 403 => ErrorCategory::Auth,
                404 => ErrorCategory::NotFound,
                500..=599 => ErrorCategory::Server,
                _ => ErrorCategory::Other,
            },
            Self::MalformedResponse { .. } => ErrorCategory::Format,
            Self::Transport { .. } => ErrorCategory::Network,
            Self::Config(_) => ErrorCategory::Config,
        }
    }
}

impl From<ureq::Error> for Error {
    fn from(err: ureq::Error) -> Self {
        Self::transport(err.to_string())
    }
}
