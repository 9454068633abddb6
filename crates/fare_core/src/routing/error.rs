use thiserror::Error;

/// Whether a failure needs an operator (configuration) or is a property of the
/// particular request or moment (runtime).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    Configuration,
    Runtime,
}

/// Errors encountered while querying the mapping provider.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MapServiceError {
    /// Disabled, missing API key, or unsupported build.
    #[error("map service not configured: {0}")]
    NotConfigured(&'static str),

    #[error("invalid map service URL: {0}")]
    InvalidUrl(String),

    /// `REQUEST_DENIED`, `INVALID_REQUEST`, `OVER_DAILY_LIMIT`.
    #[error("map service rejected the request ({status}): {message}")]
    RequestDenied { status: String, message: String },

    #[error("map service request timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },

    #[error("map service transport error: {0}")]
    Transport(String),

    #[error("map service returned HTTP {status}")]
    HttpStatus { status: u16, body: String },

    /// `OVER_QUERY_LIMIT`, `UNKNOWN_ERROR`.
    #[error("map service temporarily unavailable ({status}): {message}")]
    Unavailable { status: String, message: String },

    /// Provider answered but has no route between the points.
    #[error("no route found ({0})")]
    NoRoute(String),

    #[error("malformed map service response: {0}")]
    Decode(String),
}

impl MapServiceError {
    pub fn class(&self) -> FailureClass {
        match self {
            Self::NotConfigured(_) | Self::InvalidUrl(_) | Self::RequestDenied { .. } => {
                FailureClass::Configuration
            }
            Self::HttpStatus { status, .. } if matches!(status, 401 | 403) => {
                FailureClass::Configuration
            }
            _ => FailureClass::Runtime,
        }
    }

    pub fn is_configuration(&self) -> bool {
        self.class() == FailureClass::Configuration
    }

    /// Returns `true` if retrying the same request might succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Transport(_) | Self::Unavailable { .. } => true,
            Self::HttpStatus { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}
